//! Ordered curriculum editing: the working sequence, its structural
//! operations, and the commit hand-off to a sink.

pub mod command;
pub mod editor;
pub mod error;
pub mod fingerprint;
pub mod notice;
pub mod sink;

pub use command::{CommandError, EditCommand};
pub use editor::{
    CommitGuard, Direction, EditorMode, FieldEdit, OrderedItemEditor, PendingCommit,
};
pub use error::{EditorError, SinkError, TransportKind};
pub use fingerprint::{fingerprint, fingerprint_file};
pub use notice::{Notice, NoticeCategory, NoticeLevel};
pub use sink::{ChannelSink, CommitSink, FileSink, HttpSink, SinkReceipt};
