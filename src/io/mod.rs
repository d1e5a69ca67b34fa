//! I/O layer: the CSV record source, form rendering, the HTTP transport to the
//! receiver, and interpretation of its OpenRosa responses.
pub mod form;
pub use form::{FormRenderer, RenderedForm, SubmissionContext};

pub mod records;
pub use records::{Record, RecordReader};

pub mod response;
pub use response::{OPENROSA_RESPONSE_NS, interpret_response};

pub mod transport;
pub use transport::{HttpReply, HttpTransport, Transport, receiver_url};
