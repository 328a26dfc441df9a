const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

use rand::Rng;

pub fn random_string(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// Source of user and comment ids.
pub trait IdGenerator: Send + Sync {
    fn generate_id(&self, len: usize) -> String;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate_id(&self, len: usize) -> String {
        random_string(len)
    }
}

/// Hands out the same id every time.
#[derive(Debug, Clone)]
pub struct FixedIdGenerator(pub String);

impl Default for FixedIdGenerator {
    fn default() -> Self {
        Self("generated_id".to_string())
    }
}

impl IdGenerator for FixedIdGenerator {
    fn generate_id(&self, _len: usize) -> String {
        self.0.clone()
    }
}
