//! # pdf-signer
//!
//! A Rust library for creating PDF documents and applying PAdES-style
//! digital signatures to existing ones via incremental update.
//!
//! ## Features
//!
//! - **PDF Creation**: Generate valid PDF 1.7 and 2.0 documents
//! - **Text Support**: Use all 14 standard PDF fonts
//! - **Graphics**: Draw shapes, lines, and apply colors
//! - **Builder Pattern**: Fluent API for document construction
//! - **Digital Signatures** (`signatures` feature): append a CMS/PKCS#7
//!   detached signature, a visible or invisible signature field, and an
//!   RFC 3161 timestamp to an existing PDF without rewriting a single byte
//!   of the original file, then verify the result.
//!
//! ## Quick Start
//!
//! ```rust
//! use pdf_signer::prelude::*;
//!
//! // Create a simple PDF with text
//! let content = ContentBuilder::new()
//!     .text("F1", 24.0, 72.0, 750.0, "Hello, World!");
//!
//! let page = PageBuilder::a4()
//!     .font("F1", Standard14Font::Helvetica)
//!     .content(content)
//!     .build();
//!
//! let doc = DocumentBuilder::new()
//!     .title("My Document")
//!     .author("pdf-signer")
//!     .page(page)
//!     .build()
//!     .unwrap();
//!
//! // Save to file
//! // doc.save_to_file("output.pdf").unwrap();
//!
//! // Or get bytes
//! let _bytes = doc.save_to_bytes().unwrap();
//! ```
//!
//! ## Drawing Graphics
//!
//! ```rust
//! use pdf_signer::prelude::*;
//!
//! let content = ContentBuilder::new()
//!     .save_state()
//!     .fill_color(Color::rgb(1.0, 0.0, 0.0))
//!     .rect(100.0, 100.0, 200.0, 150.0)
//!     .fill()
//!     .restore_state()
//!     .save_state()
//!     .stroke_color(Color::BLUE)
//!     .line_width(2.0)
//!     .move_to(100.0, 300.0)
//!     .line_to(300.0, 500.0)
//!     .stroke()
//!     .restore_state();
//! ```
//!
//! ## Signing an existing PDF
//!
//! ```ignore
//! use pdf_signer::signatures::{sign_file, SignRequest, KeypairSigner, Certificate, PrivateKey};
//!
//! let cert = Certificate::from_pem_file("cert.pem")?;
//! let key = PrivateKey::from_pem_file("key.pem")?;
//! let signer = KeypairSigner::new(key, cert.clone());
//!
//! let request = SignRequest::new(Box::new(signer), cert)
//!     .reason("Approved")
//!     .location("Remote");
//!
//! sign_file("input.pdf".as_ref(), "signed.pdf".as_ref(), request)?;
//! # Ok::<(), pdf_signer::error::PdfError>(())
//! ```

// Module declarations
pub mod color;
pub mod content;
pub mod document;
#[cfg(feature = "encryption")]
pub mod encryption;
pub mod error;
pub mod font;
pub mod forms;
#[cfg(feature = "images")]
pub mod image;
pub mod object;
pub mod page;
#[cfg(feature = "parser")]
pub mod parser;
#[cfg(feature = "signatures")]
pub mod incremental;
#[cfg(feature = "signatures")]
pub mod signatures;
pub mod types;
pub mod writer;

// FFI interface for C/dynamic library usage
pub mod ffi;

// Re-export commonly used types
pub use color::{CmykColor, Color, GrayColor, RgbColor};
pub use content::{ContentBuilder, GraphicsBuilder, Operator, TextBuilder, TextElement};
pub use document::{Document, DocumentBuilder, DocumentInfo, PdfVersion};
pub use error::{ContentError, DocumentError, FormError, ObjectError, PdfError, PdfResult, WriterError};
#[cfg(feature = "compression")]
pub use error::CompressionError;
#[cfg(feature = "images")]
pub use error::ImageError;
#[cfg(feature = "parser")]
pub use error::ParserError;
#[cfg(feature = "encryption")]
pub use error::EncryptionError;
#[cfg(feature = "signatures")]
pub use error::SignatureError;
#[cfg(feature = "encryption")]
pub use encryption::{EncryptionConfig, EncryptionHandler, Permissions};
#[cfg(feature = "signatures")]
pub use signatures::{ByteRange, Certificate, DocumentSigner, PrivateKey, SignatureConfig, VerifyOptions, VerifyResponse};
pub use font::{Font, FontMetrics, Standard14Font};
pub use forms::{
    AppearanceBuilder, BorderStyle, CheckBox, ComboBox, FieldFlags, FormField, FormFieldTrait,
    FormFieldType, ListBox, PushButton, RadioButton, RadioGroup, TextField,
};
#[cfg(feature = "images")]
pub use image::{ColorSpace, Image, ImageFilter, ImageXObject};
#[cfg(feature = "parser")]
pub use parser::{PdfReader, Trailer, XrefEntry, XrefTable};
pub use object::{
    DictionaryBuilder, Object, PdfArray, PdfDictionary, PdfName, PdfStream, PdfString,
    StreamBuilder,
};
pub use page::{Page, PageBuilder};
pub use types::{Matrix, ObjectId, Rectangle};
pub use writer::PdfWriter;

/// Prelude module for convenient imports.
///
/// Use `use pdf_signer::prelude::*;` to import all commonly used types.
pub mod prelude {
    pub use crate::color::{CmykColor, Color, GrayColor, RgbColor};
    pub use crate::content::{
        kern, text, ContentBuilder, GraphicsBuilder, Operator, TextBuilder, TextElement,
    };
    pub use crate::document::{Document, DocumentBuilder, DocumentInfo, PdfVersion};
    pub use crate::error::{PdfError, PdfResult};
    #[cfg(feature = "compression")]
    pub use crate::error::CompressionError;
    #[cfg(feature = "images")]
    pub use crate::error::ImageError;
    #[cfg(feature = "parser")]
    pub use crate::error::ParserError;
    #[cfg(feature = "encryption")]
    pub use crate::error::EncryptionError;
    #[cfg(feature = "signatures")]
    pub use crate::error::SignatureError;
    #[cfg(feature = "encryption")]
    pub use crate::encryption::{EncryptionConfig, EncryptionHandler, Permissions};
    #[cfg(feature = "signatures")]
    pub use crate::signatures::{ByteRange, Certificate, DocumentSigner, PrivateKey, SignatureConfig, VerifyOptions, VerifyResponse};
    pub use crate::font::{Font, FontMetrics, Standard14Font};
    pub use crate::forms::{
        AppearanceBuilder, BorderStyle, CheckBox, ComboBox, FieldFlags, FormField,
        FormFieldTrait, FormFieldType, ListBox, PushButton, RadioButton, RadioGroup, TextField,
    };
    #[cfg(feature = "images")]
    pub use crate::image::{ColorSpace, Image, ImageFilter, ImageXObject};
    pub use crate::object::{Object, PdfArray, PdfDictionary, PdfName, PdfStream, PdfString};
    #[cfg(feature = "parser")]
    pub use crate::parser::PdfReader;
    pub use crate::page::{Page, PageBuilder};
    pub use crate::types::{Matrix, ObjectId, Rectangle};
}
