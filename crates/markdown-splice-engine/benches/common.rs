// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **some** content and a [link][docs].\n\n- Bullet point\n  - Nested *item*\n- Another item\n\n> Quoted **text**\nwith a lazy line\n\n```rust\nfn example() {\n    println!(\"Hello\");\n}\n```\n\n| a | b |\n|---|:-:|\n| 1 | 2 |\n\n";
    let mut content = base.repeat(size);
    content.push_str("[docs]: https://example.com \"Docs\"\n");
    content
}

#[allow(dead_code)]
pub fn generate_complex_markdown(sections: usize, depth: usize) -> String {
    let mut content = String::new();

    for section in 0..sections {
        content.push_str(&format!("# Section {}\n\n", section));
        content.push_str(&generate_nested_content(depth, 2));
        content.push('\n');
    }

    content
}

#[allow(dead_code)]
fn generate_nested_content(remaining_depth: usize, current_level: usize) -> String {
    if remaining_depth == 0 {
        return String::new();
    }

    let mut content = String::new();
    let quote_prefix = "> ".repeat((current_level - 2).min(3));

    content.push_str(&format!(
        "{}Subsection level {} with **strong** and *emphasis*.\n\n",
        quote_prefix, current_level
    ));

    for i in 0..3 {
        content.push_str(&format!("{}- Item {} at level {}\n", quote_prefix, i, current_level));
    }
    content.push('\n');

    if remaining_depth > 1 && current_level < 6 {
        content.push_str(&generate_nested_content(
            remaining_depth - 1,
            current_level + 1,
        ));
    }

    content
}
