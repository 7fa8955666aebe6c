//! Open-world string enumerations.
//!
//! Every status-like field NZBGet reports is a string drawn from a documented
//! set of literals. Newer server versions add literals over time, so these
//! types are string-backed: the known literals are exposed as associated
//! constants, and any other string still decodes and serializes back
//! unchanged.
//!
//! ```
//! use nzbget_rpc::status::GroupStatus;
//!
//! let status: GroupStatus = serde_json::from_str("\"DOWNLOADING\"").unwrap();
//! assert_eq!(status, GroupStatus::DOWNLOADING);
//!
//! let future: GroupStatus = serde_json::from_str("\"QUANTUM_SORTING\"").unwrap();
//! assert!(!future.is_known());
//! assert_eq!(future.as_str(), "QUANTUM_SORTING");
//! ```

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $konst:ident = $lit:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Cow<'static, str>);

        impl $name {
            $( $(#[$vmeta])* pub const $konst: $name = $name(Cow::Borrowed($lit)); )+

            /// Every literal this version of the crate knows about.
            pub const KNOWN: &'static [$name] = &[$($name::$konst),+];

            /// Wrap an arbitrary literal, known or not.
            pub fn new(value: impl Into<String>) -> Self {
                Self(Cow::Owned(value.into()))
            }

            /// The literal as sent on the wire.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// `true` if the literal is one of the associated constants.
            pub fn is_known(&self) -> bool {
                Self::KNOWN.iter().any(|k| k.as_str() == self.as_str())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self(Cow::Borrowed(""))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.as_str()
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.as_str() == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.as_str() == *other
            }
        }
    };
}

string_enum! {
    /// Lifecycle of a queued download group.
    GroupStatus {
        QUEUED = "QUEUED",
        PAUSED = "PAUSED",
        DOWNLOADING = "DOWNLOADING",
        /// nzb-file is being fetched from a URL (Kind=URL).
        FETCHING = "FETCHING",
        /// Completely downloaded, waiting for post-processing.
        PP_QUEUED = "PP_QUEUED",
        LOADING_PARS = "LOADING_PARS",
        VERIFYING_SOURCES = "VERIFYING_SOURCES",
        REPAIRING = "REPAIRING",
        VERIFYING_REPAIRED = "VERIFYING_REPAIRED",
        RENAMING = "RENAMING",
        UNPACKING = "UNPACKING",
        /// Moving files from the intermediate into the destination directory.
        MOVING = "MOVING",
        EXECUTING_SCRIPT = "EXECUTING_SCRIPT",
        /// Post-processing done; the item is about to move to history.
        PP_FINISHED = "PP_FINISHED",
    }
}

impl GroupStatus {
    /// Stages that run after the download itself has completed.
    pub fn is_post_processing(&self) -> bool {
        [
            Self::PP_QUEUED,
            Self::LOADING_PARS,
            Self::VERIFYING_SOURCES,
            Self::REPAIRING,
            Self::VERIFYING_REPAIRED,
            Self::RENAMING,
            Self::UNPACKING,
            Self::MOVING,
            Self::EXECUTING_SCRIPT,
            Self::PP_FINISHED,
        ]
        .contains(self)
    }
}

string_enum! {
    /// Result of par-check/repair.
    ParStatus {
        NONE = "NONE",
        FAILURE = "FAILURE",
        /// Damaged; extra pars were downloaded but repair did not run.
        REPAIR_POSSIBLE = "REPAIR_POSSIBLE",
        SUCCESS = "SUCCESS",
        /// Damaged but not checked because ParCheck is set to Manual.
        MANUAL = "MANUAL",
    }
}

string_enum! {
    /// Whether a download took part in duplicate par-scan repair.
    ExParStatus {
        /// Repaired using blocks from other duplicates.
        RECIPIENT = "RECIPIENT",
        /// Donated blocks to repair another duplicate.
        DONOR = "DONOR",
    }
}

string_enum! {
    /// Result of archive extraction.
    UnpackStatus {
        NONE = "NONE",
        FAILURE = "FAILURE",
        /// Not enough disk space.
        SPACE = "SPACE",
        /// Missing or wrong password (rar5 only).
        PASSWORD = "PASSWORD",
        SUCCESS = "SUCCESS",
    }
}

string_enum! {
    /// Result of fetching an nzb-file from a URL.
    UrlStatus {
        NONE = "NONE",
        SUCCESS = "SUCCESS",
        FAILURE = "FAILURE",
        /// Fetched, but the file was not an nzb-file.
        SCAN_SKIPPED = "SCAN_SKIPPED",
        /// Fetched, but scanning failed (usually an HTML error page).
        SCAN_FAILURE = "SCAN_FAILURE",
    }
}

string_enum! {
    /// Result of moving files out of the intermediate directory.
    MoveStatus {
        NONE = "NONE",
        SUCCESS = "SUCCESS",
        FAILURE = "FAILURE",
    }
}

string_enum! {
    /// User verdict on a history item.
    MarkStatus {
        NONE = "NONE",
        GOOD = "GOOD",
        BAD = "BAD",
    }
}

string_enum! {
    /// Whether and why a download was removed.
    DeleteStatus {
        NONE = "NONE",
        MANUAL = "MANUAL",
        HEALTH = "HEALTH",
        DUPE = "DUPE",
        /// Marked BAD by a queue script during download.
        BAD = "BAD",
        /// The nzb-file could not be parsed.
        SCAN = "SCAN",
        /// An nzb-file with identical content already exists.
        COPY = "COPY",
    }
}

string_enum! {
    /// Result of a post-processing script.
    ScriptStatus {
        NONE = "NONE",
        FAILURE = "FAILURE",
        SUCCESS = "SUCCESS",
    }
}

string_enum! {
    /// Severity of a log entry.
    LogKind {
        INFO = "INFO",
        WARNING = "WARNING",
        ERROR = "ERROR",
        DETAIL = "DETAIL",
        /// Only emitted by debug builds of the server.
        DEBUG = "DEBUG",
    }
}

string_enum! {
    /// Duplicate handling mode for `append`.
    DupeMode {
        SCORE = "SCORE",
        ALL = "ALL",
        FORCE = "FORCE",
    }
}

string_enum! {
    /// Commands accepted by `editqueue`.
    EditCommand {
        FILE_DELETE = "FileDelete",
        FILE_PAUSE = "FilePause",
        FILE_RESUME = "FileResume",
        GROUP_MOVE_OFFSET = "GroupMoveOffset",
        GROUP_MOVE_TOP = "GroupMoveTop",
        GROUP_MOVE_BOTTOM = "GroupMoveBottom",
        GROUP_PAUSE = "GroupPause",
        GROUP_RESUME = "GroupResume",
        GROUP_DELETE = "GroupDelete",
        GROUP_FINAL_DELETE = "GroupFinalDelete",
        GROUP_SET_PRIORITY = "GroupSetPriority",
        GROUP_SET_CATEGORY = "GroupSetCategory",
        HISTORY_DELETE = "HistoryDelete",
        HISTORY_FINAL_DELETE = "HistoryFinalDelete",
        HISTORY_RETURN = "HistoryReturn",
        HISTORY_PROCESS = "HistoryProcess",
        HISTORY_REDOWNLOAD = "HistoryRedownload",
        HISTORY_RETRY_FAILED = "HistoryRetryFailed",
        HISTORY_MARK_GOOD = "HistoryMarkGood",
        HISTORY_MARK_BAD = "HistoryMarkBad",
        HISTORY_MARK_SUCCESS = "HistoryMarkSuccess",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_open_world<T>(known: &[T])
    where
        T: Serialize + for<'de> Deserialize<'de> + PartialEq + fmt::Debug + AsRef<str>,
    {
        for value in known {
            let json = serde_json::to_string(value).unwrap();
            assert_eq!(json, format!("\"{}\"", value.as_ref()));
            let back: T = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, value);
        }

        let unknown: T = serde_json::from_str("\"FUTURE_LITERAL_V99\"").unwrap();
        assert_eq!(unknown.as_ref(), "FUTURE_LITERAL_V99");
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"FUTURE_LITERAL_V99\"");
    }

    #[test]
    fn test_every_enum_accepts_known_and_unknown_literals() {
        assert_open_world(GroupStatus::KNOWN);
        assert_open_world(ParStatus::KNOWN);
        assert_open_world(ExParStatus::KNOWN);
        assert_open_world(UnpackStatus::KNOWN);
        assert_open_world(UrlStatus::KNOWN);
        assert_open_world(MoveStatus::KNOWN);
        assert_open_world(MarkStatus::KNOWN);
        assert_open_world(DeleteStatus::KNOWN);
        assert_open_world(ScriptStatus::KNOWN);
        assert_open_world(LogKind::KNOWN);
        assert_open_world(DupeMode::KNOWN);
        assert_open_world(EditCommand::KNOWN);
    }

    #[test]
    fn test_known_literal_matches_constant() {
        let status: GroupStatus = serde_json::from_str("\"PP_QUEUED\"").unwrap();
        assert_eq!(status, GroupStatus::PP_QUEUED);
        assert!(status.is_known());

        let kind: LogKind = serde_json::from_str("\"WARNING\"").unwrap();
        assert_eq!(kind, LogKind::WARNING);
        assert_eq!(kind, "WARNING");
    }

    #[test]
    fn test_unknown_literal_is_not_known() {
        let status = DeleteStatus::new("GOOD_BUT_GONE");
        assert!(!status.is_known());
        assert_ne!(status, DeleteStatus::NONE);
        assert_eq!(status.to_string(), "GOOD_BUT_GONE");
    }

    #[test]
    fn test_constructed_equals_constant() {
        assert_eq!(ParStatus::new("SUCCESS"), ParStatus::SUCCESS);
        assert_eq!(UrlStatus::from("SCAN_SKIPPED"), UrlStatus::SCAN_SKIPPED);
        assert_eq!(EditCommand::from(String::from("GroupPause")), EditCommand::GROUP_PAUSE);
    }

    #[test]
    fn test_literal_sets() {
        assert_eq!(GroupStatus::KNOWN.len(), 14);
        assert_eq!(ParStatus::KNOWN.len(), 5);
        assert_eq!(UnpackStatus::KNOWN.len(), 5);
        assert_eq!(DeleteStatus::KNOWN.len(), 7);
        assert_eq!(LogKind::KNOWN.len(), 5);
    }

    #[test]
    fn test_default_is_empty() {
        assert_eq!(MarkStatus::default().as_str(), "");
        assert!(!MarkStatus::default().is_known());
    }

    #[test]
    fn test_non_string_is_rejected() {
        assert!(serde_json::from_str::<ParStatus>("3").is_err());
        assert!(serde_json::from_str::<ParStatus>("null").is_err());
    }

    #[test]
    fn test_post_processing_stages() {
        assert!(GroupStatus::UNPACKING.is_post_processing());
        assert!(GroupStatus::PP_FINISHED.is_post_processing());
        assert!(!GroupStatus::DOWNLOADING.is_post_processing());
        assert!(!GroupStatus::new("SOMETHING_NEW").is_post_processing());
    }
}
