pub mod callout_type;
pub mod element_state;
pub mod parsed;
pub mod registry;

pub use callout_type::{BackgroundStyle, CalloutTypeDescriptor, Icon, LEGACY_SIGIL, builtin_types};
pub use element_state::CalloutElementState;
pub use parsed::ParsedCommand;
pub use registry::TypeRegistry;
