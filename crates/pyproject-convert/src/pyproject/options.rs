/// Settings shared by both conversion directions.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Rewrite constraints between Poetry's `^`/`~` shorthand and PEP 440
    /// ranges instead of copying them verbatim.
    pub translate_constraints: bool,

    /// Python constraint to record when the source declares none.
    pub python: Option<String>,
}
