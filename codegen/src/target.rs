use crate::ir::AccessorDef;

/// A language back end that renders accessor IR into source text.
pub trait Target {
    /// File name for one rendered accessor.
    fn file_name(&self, def: &AccessorDef) -> String;

    /// File name for the index listing every accessor of a run.
    fn index_file_name(&self) -> &'static str;

    /// Renders one accessor.
    fn render(&self, def: &AccessorDef) -> String;

    /// Renders the index of a multi-schema run.
    fn render_index(&self, defs: &[AccessorDef]) -> String;
}
