//! Rolling polynomial hash over line sequences.
//!
//! Only ever used as a cache fingerprint: it is fast and non-cryptographic, and two different
//! inputs may collide.

const BASE: u64 = 31;
const LINE_BREAK: u64 = 0x1f;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentHasher {
    state: u64,
}

impl Default for ContentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentHasher {
    pub fn new() -> Self {
        Self { state: 0 }
    }

    pub fn write_line(&mut self, line: &str) {
        for byte in line.bytes() {
            self.state = self
                .state
                .wrapping_mul(BASE)
                .wrapping_add(u64::from(byte) + 1);
        }
        self.state = self.state.wrapping_mul(BASE).wrapping_add(LINE_BREAK);
    }

    pub fn finish(&self) -> u64 {
        self.state
    }
}

pub fn hash_lines<S: AsRef<str>>(lines: &[S]) -> u64 {
    let mut hasher = ContentHasher::new();
    for line in lines {
        hasher.write_line(line.as_ref());
    }
    hasher.finish()
}

/// Cheap identity for an (old, new) pair of line sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    old_len: usize,
    new_len: usize,
    old_chars: usize,
    new_chars: usize,
    old_hash: u64,
    new_hash: u64,
}

impl Fingerprint {
    pub fn of<S: AsRef<str>>(old: &[S], new: &[S]) -> Self {
        Self {
            old_len: old.len(),
            new_len: new.len(),
            old_chars: char_total(old),
            new_chars: char_total(new),
            old_hash: hash_lines(old),
            new_hash: hash_lines(new),
        }
    }
}

fn char_total<S: AsRef<str>>(lines: &[S]) -> usize {
    lines.iter().map(|line| line.as_ref().chars().count()).sum()
}
