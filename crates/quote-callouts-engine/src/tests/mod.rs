//! Shared fixtures for unit tests.

use crate::models::TypeRegistry;

pub fn registry() -> TypeRegistry {
    TypeRegistry::builtin()
}
