pub mod assembler;
pub mod sections;
pub mod text;

pub use assembler::assemble;
pub use sections::{
    ChartDescriptor, Field, FieldValue, Note, Section, SectionKind, StructuredReport, Table, Tone,
};
pub use text::render_text;
