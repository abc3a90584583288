//! Special-character sanitization used by the `string` rule.

/// Escapes HTML special characters and control characters as numeric
/// entities.
///
/// Replaces:
/// - `&` -> `&#38;`
/// - `<` -> `&#60;`
/// - `>` -> `&#62;`
/// - `"` -> `&#34;`
/// - `'` -> `&#39;`
/// - any character below U+0020 -> `&#NN;`
pub fn sanitize_special_chars(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' | '<' | '>' | '"' | '\'' => push_entity(&mut output, c),
            c if (c as u32) < 0x20 => push_entity(&mut output, c),
            _ => output.push(c),
        }
    }
    output
}

fn push_entity(output: &mut String, c: char) {
    output.push_str("&#");
    output.push_str(&(c as u32).to_string());
    output.push(';');
}
