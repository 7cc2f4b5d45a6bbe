use takeo_core::SqlWriter;

/// Postgres dialect: `$n` placeholders, identifiers quoted when they would
/// otherwise be folded to lower case or are not plain words.
#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl PostgresSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

fn is_plain_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl SqlWriter for PostgresSqlWriter {
    fn write_identifier(&self, out: &mut String, value: &str) {
        if is_plain_identifier(value) {
            out.push_str(value);
        } else {
            out.push('"');
            out.push_str(&value.replace('"', "\"\""));
            out.push('"');
        }
    }
}
