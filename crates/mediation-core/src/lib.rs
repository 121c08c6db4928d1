pub mod decode;
pub mod error;
pub mod lint;
pub mod model;
pub mod value;

pub use decode::{DecodeConfig, Decoder, decode_page};
pub use error::{DecodeError, DecodeErrorKind, NodePath, ValueParseError};
pub use lint::{LintDiagnostic, LintSeverity, lint_page};
pub use model::*;
pub use value::{Color, CornerRadii, Density, Length, LengthUnit, Shape, TextSize, TextUnit};
