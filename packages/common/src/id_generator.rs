use crc32fast::Hasher;

/// Derive a short, stable seed from a document name using CRC32
pub fn get_document_seed(name: &str) -> String {
    let mut hasher = Hasher::new();
    hasher.update(name.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for blocks within one editing session.
///
/// Ids are never reused: the counter only moves forward, so a block created
/// after an undo never collides with a block that lives on in the redo branch.
#[derive(Debug, Clone)]
pub struct IDGenerator {
    seed: String,
    count: u32,
}

impl IDGenerator {
    pub fn new(name: &str) -> Self {
        Self {
            seed: get_document_seed(name),
            count: 0,
        }
    }

    /// Move the counter past `id` when it was issued under this seed, so a
    /// reloaded document never gets one of its own ids handed out again
    pub fn observe(&mut self, id: &str) {
        let issued = id
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
            .and_then(|n| n.parse::<u32>().ok());

        if let Some(n) = issued {
            self.count = self.count.max(n);
        }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Number of ids handed out so far
    pub fn issued(&self) -> u32 {
        self.count
    }
}
