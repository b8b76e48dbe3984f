//! Typed value model and ValueConverter registry used when rendering
//! fixture return values to the wire and parsing fixture arguments back
//! out of it.

mod converters;
mod error;
mod registry;
mod value;

pub use converters::{
    DateConverter, DateTimeConverter, FloatConverter, IntConverter, MappingConverter,
    SequenceConverter, StrConverter, TimeConverter, TrueFalseConverter, ValueConverter,
    YesNoConverter,
};
pub use error::ConverterError;
pub use registry::ConverterRegistry;
pub use value::{Value, ValueKind};
