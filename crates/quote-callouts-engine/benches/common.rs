// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_titles(count: usize) -> Vec<String> {
    const SHAPES: [&str; 6] = [
        "[!info]",
        "[!warning|25%|200px]- Careful",
        "[!tip|30|2em]+",
        "[!note|150%|40px|abc] Margin note",
        "@todo Groceries",
        "Just a plain quotation without a directive",
    ];
    (0..count)
        .map(|i| SHAPES[i % SHAPES.len()].to_string())
        .collect()
}
