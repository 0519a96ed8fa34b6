//! The record kinds carried inside an envelope.

use prost::Message;
use serde::{Deserialize, Serialize};

use crate::error::CodecError;
use crate::timestamp::Timestamp;
use crate::wire::{self, RawKeepAlive, RawProgramRun};

/// Cap on the number of entries in [`ProgramRun::args`].
///
/// The wire format declares no bound, so the codec imposes one to fail
/// closed on hostile payloads.  Real audit traffic rarely exceeds a few
/// dozen arguments; 1024 leaves ample headroom.  Enforced on both encode
/// and decode.
pub const MAX_ARGS: usize = 1024;

/// One observed process-execution audit event.
///
/// All numeric fields are 32-bit signed, matching the syscall ABI widths;
/// the decoder rejects wider values rather than truncating them.  `args`
/// preserves argv order exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramRun {
    pub timestamp: Timestamp,
    /// Syscall architecture, e.g. "amd64" or "i386".
    pub arch: String,
    /// Syscall number; execve-family in practice.
    pub syscall: i32,
    pub success: bool,
    pub exit: i32,
    pub pid: i32,
    pub ppid: i32,
    pub uid: i32,
    pub gid: i32,
    /// Audit-session user id, tracing the event back to a login session.
    pub auid: i32,
    pub euid: i32,
    pub egid: i32,
    pub suid: i32,
    pub sgid: i32,
    pub fsuid: i32,
    pub fsgid: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exe: Option<String>,
    /// Audit rule key, if the triggering rule carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    /// Security subject label (e.g. an SELinux context).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subj: Option<String>,
    /// Argument strings in argv order; may be empty.
    #[serde(default)]
    pub args: Vec<String>,
}

impl ProgramRun {
    /// Check the constraints the type system does not already guarantee.
    ///
    /// The required fields are plain (non-optional) struct members, so the
    /// only remaining check is the [`MAX_ARGS`] cap.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.args.len() > MAX_ARGS {
            return Err(CodecError::LimitExceeded {
                count: self.args.len(),
                max: MAX_ARGS,
            });
        }
        Ok(())
    }

    /// Validate and serialise this record as envelope payload bytes.
    pub fn to_payload(&self) -> Result<Vec<u8>, CodecError> {
        self.validate()?;
        Ok(RawProgramRun::from(self).encode_to_vec())
    }

    /// Decode a record from envelope payload bytes.
    ///
    /// Fails with [`CodecError::MissingField`] naming the first absent
    /// required field, [`CodecError::Range`] on a numeric field wider than
    /// 32 bits, [`CodecError::Encoding`] on invalid UTF-8, and
    /// [`CodecError::LimitExceeded`] when `args` exceeds [`MAX_ARGS`].
    pub fn from_payload(bytes: &[u8]) -> Result<Self, CodecError> {
        RawProgramRun::decode(bytes)?.try_into()
    }
}

impl From<&ProgramRun> for RawProgramRun {
    fn from(run: &ProgramRun) -> Self {
        Self {
            timestamp: Some(run.timestamp.into()),
            arch: Some(run.arch.clone().into_bytes()),
            syscall: Some(i64::from(run.syscall)),
            success: Some(run.success),
            exit: Some(i64::from(run.exit)),
            pid: Some(i64::from(run.pid)),
            ppid: Some(i64::from(run.ppid)),
            uid: Some(i64::from(run.uid)),
            gid: Some(i64::from(run.gid)),
            auid: Some(i64::from(run.auid)),
            euid: Some(i64::from(run.euid)),
            egid: Some(i64::from(run.egid)),
            suid: Some(i64::from(run.suid)),
            sgid: Some(i64::from(run.sgid)),
            fsuid: Some(i64::from(run.fsuid)),
            fsgid: Some(i64::from(run.fsgid)),
            tty: run.tty.clone().map(String::into_bytes),
            comm: run.comm.clone().map(String::into_bytes),
            exe: run.exe.clone().map(String::into_bytes),
            key: run.key.clone().map(String::into_bytes),
            subj: run.subj.clone().map(String::into_bytes),
            args: run.args.iter().map(|a| a.clone().into_bytes()).collect(),
        }
    }
}

impl TryFrom<RawProgramRun> for ProgramRun {
    type Error = CodecError;

    fn try_from(raw: RawProgramRun) -> Result<Self, CodecError> {
        if raw.args.len() > MAX_ARGS {
            return Err(CodecError::LimitExceeded {
                count: raw.args.len(),
                max: MAX_ARGS,
            });
        }

        let args = raw
            .args
            .into_iter()
            .map(|a| wire::utf8(a, "args"))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            timestamp: wire::require(raw.timestamp, "timestamp")?.try_into()?,
            arch: wire::utf8(wire::require(raw.arch, "arch")?, "arch")?,
            syscall: wire::require_i32(raw.syscall, "syscall")?,
            success: wire::require(raw.success, "success")?,
            exit: wire::require_i32(raw.exit, "exit")?,
            pid: wire::require_i32(raw.pid, "pid")?,
            ppid: wire::require_i32(raw.ppid, "ppid")?,
            uid: wire::require_i32(raw.uid, "uid")?,
            gid: wire::require_i32(raw.gid, "gid")?,
            auid: wire::require_i32(raw.auid, "auid")?,
            euid: wire::require_i32(raw.euid, "euid")?,
            egid: wire::require_i32(raw.egid, "egid")?,
            suid: wire::require_i32(raw.suid, "suid")?,
            sgid: wire::require_i32(raw.sgid, "sgid")?,
            fsuid: wire::require_i32(raw.fsuid, "fsuid")?,
            fsgid: wire::require_i32(raw.fsgid, "fsgid")?,
            tty: wire::opt_utf8(raw.tty, "tty")?,
            comm: wire::opt_utf8(raw.comm, "comm")?,
            exe: wire::opt_utf8(raw.exe, "exe")?,
            key: wire::opt_utf8(raw.key, "key")?,
            subj: wire::opt_utf8(raw.subj, "subj")?,
            args,
        })
    }
}

/// Liveness signal for an otherwise idle channel.
///
/// Carries only a timestamp; a consumer may compare successive keep-alive
/// timestamps to spot producer clock skew or a stalled channel, but timeout
/// policy belongs to the transport, not the codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeepAlive {
    pub timestamp: Timestamp,
}

impl KeepAlive {
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp }
    }

    /// A keep-alive stamped with the current wall-clock time.
    pub fn now() -> Self {
        Self::new(Timestamp::now())
    }

    /// Serialise this record as envelope payload bytes.
    pub fn to_payload(&self) -> Vec<u8> {
        RawKeepAlive {
            timestamp: Some(self.timestamp.into()),
        }
        .encode_to_vec()
    }

    /// Decode a record from envelope payload bytes.
    pub fn from_payload(bytes: &[u8]) -> Result<Self, CodecError> {
        let raw = RawKeepAlive::decode(bytes)?;
        Ok(Self {
            timestamp: wire::require(raw.timestamp, "timestamp")?.try_into()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::RawTimestamp;

    fn sample_run() -> ProgramRun {
        ProgramRun {
            timestamp: Timestamp::new(1498852023, 639),
            arch: "amd64".to_string(),
            syscall: 59,
            success: true,
            exit: 0,
            pid: 7114,
            ppid: 7113,
            uid: 1000,
            gid: 1000,
            auid: 1000,
            euid: 1000,
            egid: 1000,
            suid: 1000,
            sgid: 1000,
            fsuid: 1000,
            fsgid: 1000,
            tty: Some("pts3".to_string()),
            comm: Some("git".to_string()),
            exe: Some("/usr/bin/git".to_string()),
            key: None,
            subj: None,
            args: vec![
                "git".to_string(),
                "rev-parse".to_string(),
                "--git-dir".to_string(),
            ],
        }
    }

    fn complete_raw() -> RawProgramRun {
        RawProgramRun::from(&sample_run())
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let run = sample_run();
        let decoded = ProgramRun::from_payload(&run.to_payload().unwrap()).unwrap();
        assert_eq!(decoded, run);
        assert_eq!(decoded.key, None);
        assert_eq!(decoded.subj, None);
        assert_eq!(
            decoded.args,
            vec!["git".to_string(), "rev-parse".to_string(), "--git-dir".to_string()]
        );
    }

    #[test]
    fn round_trip_with_all_optionals_and_no_args() {
        let mut run = sample_run();
        run.key = Some("exec-log".to_string());
        run.subj = Some("unconfined_u:unconfined_r:unconfined_t".to_string());
        run.args.clear();
        let decoded = ProgramRun::from_payload(&run.to_payload().unwrap()).unwrap();
        assert_eq!(decoded, run);
    }

    #[test]
    fn args_preserve_encode_order() {
        let mut run = sample_run();
        run.args = vec![
            "--git-dir".to_string(),
            "rev-parse".to_string(),
            "git".to_string(),
        ];
        let decoded = ProgramRun::from_payload(&run.to_payload().unwrap()).unwrap();
        // Literal encode-time order, not sorted.
        assert_eq!(decoded.args, run.args);
    }

    #[test]
    fn each_missing_required_field_is_named() {
        type Clear = fn(&mut RawProgramRun);
        let cases: [(&str, Clear); 16] = [
            ("timestamp", |r| r.timestamp = None),
            ("arch", |r| r.arch = None),
            ("syscall", |r| r.syscall = None),
            ("success", |r| r.success = None),
            ("exit", |r| r.exit = None),
            ("pid", |r| r.pid = None),
            ("ppid", |r| r.ppid = None),
            ("uid", |r| r.uid = None),
            ("gid", |r| r.gid = None),
            ("auid", |r| r.auid = None),
            ("euid", |r| r.euid = None),
            ("egid", |r| r.egid = None),
            ("suid", |r| r.suid = None),
            ("sgid", |r| r.sgid = None),
            ("fsuid", |r| r.fsuid = None),
            ("fsgid", |r| r.fsgid = None),
        ];

        for (name, clear) in cases {
            let mut raw = complete_raw();
            clear(&mut raw);
            let err = ProgramRun::from_payload(&raw.encode_to_vec()).unwrap_err();
            match err {
                CodecError::MissingField(field) => assert_eq!(field, name),
                other => panic!("field {name}: expected MissingField, got {other:?}"),
            }
        }
    }

    #[test]
    fn wide_numeric_field_is_rejected() {
        let mut raw = complete_raw();
        raw.pid = Some(1 << 40);
        let err = ProgramRun::from_payload(&raw.encode_to_vec()).unwrap_err();
        match err {
            CodecError::Range { field, value } => {
                assert_eq!(field, "pid");
                assert_eq!(value, 1 << 40);
            }
            other => panic!("expected Range, got {other:?}"),
        }
    }

    #[test]
    fn invalid_utf8_in_text_field_is_rejected() {
        let mut raw = complete_raw();
        raw.comm = Some(vec![0xff, 0xfe, 0xfd]);
        let err = ProgramRun::from_payload(&raw.encode_to_vec()).unwrap_err();
        match err {
            CodecError::Encoding(field) => assert_eq!(field, "comm"),
            other => panic!("expected Encoding, got {other:?}"),
        }
    }

    #[test]
    fn args_over_the_cap_fail_closed_on_encode() {
        let mut run = sample_run();
        run.args = vec![String::new(); MAX_ARGS + 1];
        let err = run.to_payload().unwrap_err();
        match err {
            CodecError::LimitExceeded { count, max } => {
                assert_eq!(count, MAX_ARGS + 1);
                assert_eq!(max, MAX_ARGS);
            }
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn args_over_the_cap_fail_closed_on_decode() {
        let mut raw = complete_raw();
        raw.args = vec![Vec::new(); MAX_ARGS + 1];
        let err = ProgramRun::from_payload(&raw.encode_to_vec()).unwrap_err();
        match err {
            CodecError::LimitExceeded { count, .. } => assert_eq!(count, MAX_ARGS + 1),
            other => panic!("expected LimitExceeded, got {other:?}"),
        }
    }

    #[test]
    fn args_at_the_cap_are_accepted() {
        let mut run = sample_run();
        run.args = vec!["x".to_string(); MAX_ARGS];
        let decoded = ProgramRun::from_payload(&run.to_payload().unwrap()).unwrap();
        assert_eq!(decoded.args.len(), MAX_ARGS);
    }

    #[test]
    fn unknown_field_tags_are_skipped() {
        let mut bytes = complete_raw().encode_to_vec();
        // Field 99, varint wire type, value 0 — a tag this schema does not
        // know.  Key = (99 << 3) | 0 = 792 = varint [0x98, 0x06].
        bytes.extend_from_slice(&[0x98, 0x06, 0x00]);
        let decoded = ProgramRun::from_payload(&bytes).unwrap();
        assert_eq!(decoded, sample_run());
    }

    #[test]
    fn truncated_payload_is_a_decode_error() {
        let bytes = sample_run().to_payload().unwrap();
        let err = ProgramRun::from_payload(&bytes[..bytes.len() - 3]).unwrap_err();
        match err {
            CodecError::Decode(_) => {}
            other => panic!("expected Decode, got {other:?}"),
        }
    }

    #[test]
    fn keep_alive_round_trip() {
        let ka = KeepAlive::new(Timestamp::new(1498852023, 639));
        let decoded = KeepAlive::from_payload(&ka.to_payload()).unwrap();
        assert_eq!(decoded, ka);
    }

    #[test]
    fn keep_alive_missing_timestamp_is_named() {
        let raw = RawKeepAlive { timestamp: None };
        let err = KeepAlive::from_payload(&raw.encode_to_vec()).unwrap_err();
        match err {
            CodecError::MissingField(field) => assert_eq!(field, "timestamp"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn keep_alive_nested_timestamp_is_validated() {
        let raw = RawKeepAlive {
            timestamp: Some(RawTimestamp {
                seconds: Some(1498852023),
                fraction: None,
            }),
        };
        let err = KeepAlive::from_payload(&raw.encode_to_vec()).unwrap_err();
        match err {
            CodecError::MissingField(field) => assert_eq!(field, "fraction"),
            other => panic!("expected MissingField, got {other:?}"),
        }
    }

    #[test]
    fn json_projection_omits_absent_optionals() {
        let run = sample_run();
        let json = serde_json::to_value(&run).unwrap();
        assert_eq!(json["pid"], 7114);
        assert_eq!(json["tty"], "pts3");
        assert!(json.get("key").is_none());
        assert!(json.get("subj").is_none());
    }
}
