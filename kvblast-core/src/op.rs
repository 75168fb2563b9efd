//! Operation Vocabulary
//!
//! The fixed set of store commands the harness drives, plus the immutable
//! descriptor handed from the generator to the invoker.

use std::fmt;

/// One of the store commands understood by the client under test.
///
/// `Ord` so per-kind maps iterate in a stable order across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OpKind {
    /// Read a key.
    Get,
    /// Write a key.
    Set,
    /// Delete a key.
    Del,
    /// Set a key's TTL in milliseconds.
    Pexpire,
    /// Read a key's remaining TTL in milliseconds.
    Pttl,
    /// Add a member with a score to a sorted set.
    Zadd,
    /// Remove a member from a sorted set.
    Zrem,
    /// Read a member's score.
    Zscore,
    /// Range query over a sorted set.
    Zquery,
}

impl OpKind {
    /// The full vocabulary. Kind selection is uniform over this array.
    pub const ALL: [OpKind; 9] = [
        OpKind::Get,
        OpKind::Set,
        OpKind::Del,
        OpKind::Pexpire,
        OpKind::Pttl,
        OpKind::Zadd,
        OpKind::Zrem,
        OpKind::Zscore,
        OpKind::Zquery,
    ];

    /// Lowercase wire form, passed to the client as its first argument.
    pub fn as_str(self) -> &'static str {
        match self {
            OpKind::Get => "get",
            OpKind::Set => "set",
            OpKind::Del => "del",
            OpKind::Pexpire => "pexpire",
            OpKind::Pttl => "pttl",
            OpKind::Zadd => "zadd",
            OpKind::Zrem => "zrem",
            OpKind::Zscore => "zscore",
            OpKind::Zquery => "zquery",
        }
    }

    /// Argument count each kind takes, excluding the command itself.
    pub fn arity(self) -> usize {
        match self {
            OpKind::Get | OpKind::Set | OpKind::Del | OpKind::Pttl => 1,
            OpKind::Pexpire | OpKind::Zrem | OpKind::Zscore => 2,
            OpKind::Zadd => 3,
            OpKind::Zquery => 5,
        }
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-formed operation: command kind plus its arguments in wire order.
/// Immutable once generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// The command to issue.
    pub kind: OpKind,
    /// Arguments following the command, already rendered as strings.
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_has_nine_distinct_kinds() {
        let mut kinds: Vec<&str> = OpKind::ALL.iter().map(|k| k.as_str()).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), 9);
    }

    #[test]
    fn wire_form_is_lowercase() {
        for kind in OpKind::ALL {
            let s = kind.as_str();
            assert_eq!(s, s.to_lowercase());
            assert_eq!(format!("{}", kind), s);
        }
    }

    #[test]
    fn arity_table() {
        assert_eq!(OpKind::Get.arity(), 1);
        assert_eq!(OpKind::Set.arity(), 1);
        assert_eq!(OpKind::Del.arity(), 1);
        assert_eq!(OpKind::Pexpire.arity(), 2);
        assert_eq!(OpKind::Pttl.arity(), 1);
        assert_eq!(OpKind::Zadd.arity(), 3);
        assert_eq!(OpKind::Zrem.arity(), 2);
        assert_eq!(OpKind::Zscore.arity(), 2);
        assert_eq!(OpKind::Zquery.arity(), 5);
    }

    #[test]
    fn kinds_order_deterministically() {
        let mut sorted = OpKind::ALL.to_vec();
        sorted.sort();
        // BTreeMap iteration over kinds follows declaration order.
        assert_eq!(sorted, OpKind::ALL.to_vec());
    }
}
