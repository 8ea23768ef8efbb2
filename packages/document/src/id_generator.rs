use crc32fast::Hasher;

/// Derive a stable document seed from a host-supplied document key.
pub fn document_seed(key: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential id generator for nodes within a document.
///
/// Every id ever handed out by one generator is unique, so regenerated ids
/// (paste, split) can never collide with live ones.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(key: &str) -> Self {
        Self {
            seed: document_seed(key),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate the next sequential id.
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Advance the counter past every id in `existing` that this generator's
    /// seed produced. Adopting a persisted document must not re-mint ids the
    /// previous session already handed out.
    pub fn resume_past<'a>(&mut self, existing: impl IntoIterator<Item = &'a str>) {
        for id in existing {
            let Some(suffix) = id.strip_prefix(self.seed.as_str()) else {
                continue;
            };
            if let Some(count) = suffix.strip_prefix('-').and_then(|n| n.parse::<u64>().ok()) {
                self.count = self.count.max(count);
            }
        }
    }
}
