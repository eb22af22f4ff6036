use crate::error::{ClinchatError, Result};
use crate::reply::{Reply, ReplyGenerator, ReplyRequest};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use std::time::Duration;

/// Placeholder replaced with the user's text in [`RESPONSES`]
const INPUT_PLACEHOLDER: &str = "{input}";

/// Fixed replies used when no inference backend is involved
pub const RESPONSES: [&str; 5] = [
    "Based on the clinical information provided, I recommend considering genetic testing for...",
    "The variant you described ({input}) is classified as VUS (Variant of Uncertain Significance) in ClinVar.",
    "For this clinical scenario, the ACMG guidelines suggest...",
    "This appears to be a case of potential hereditary cancer syndrome. The NCCN guidelines recommend...",
    "The patient's presentation is concerning for a possible inborn error of metabolism.",
];

/// Local reply generator
///
/// Waits for a fixed delay, then answers with one of [`RESPONSES`] chosen at
/// random. A seeded instance always makes the same sequence of choices.
pub struct CannedReplies {
    delay: Duration,
    rng: Mutex<StdRng>,
}

impl CannedReplies {
    /// Create a generator seeded from the operating system
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::from_os_rng()),
        }
    }

    /// Create a generator with a fixed seed
    pub fn with_seed(delay: Duration, seed: u64) -> Self {
        Self {
            delay,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn pick(&self, input: &str) -> Result<String> {
        let index = self
            .rng
            .lock()
            .map_err(|_| ClinchatError::Reply("Reply generator lock poisoned".to_string()))?
            .random_range(0..RESPONSES.len());
        Ok(RESPONSES[index].replace(INPUT_PLACEHOLDER, input))
    }
}

#[async_trait]
impl ReplyGenerator for CannedReplies {
    async fn generate(&self, request: &ReplyRequest) -> Result<Reply> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        let content = self.pick(&request.content)?;
        tracing::debug!("Generated canned reply for session {}", request.session_id);
        Ok(Reply::text(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(content: &str) -> ReplyRequest {
        ReplyRequest {
            session_id: "s1".to_string(),
            remote_session_id: None,
            content: content.to_string(),
        }
    }

    fn expected_replies(input: &str) -> Vec<String> {
        RESPONSES
            .iter()
            .map(|r| r.replace(INPUT_PLACEHOLDER, input))
            .collect()
    }

    #[tokio::test]
    async fn test_reply_is_one_of_the_canned_set() {
        let generator = CannedReplies::new(Duration::ZERO);
        let reply = generator.generate(&request("BRCA1")).await.unwrap();
        assert!(expected_replies("BRCA1").contains(&reply.content));
        assert!(reply.remote_session_id.is_none());
    }

    #[tokio::test]
    async fn test_same_seed_same_sequence() {
        let a = CannedReplies::with_seed(Duration::ZERO, 7);
        let b = CannedReplies::with_seed(Duration::ZERO, 7);
        for _ in 0..10 {
            let ra = a.generate(&request("x")).await.unwrap();
            let rb = b.generate(&request("x")).await.unwrap();
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn test_variant_template_interpolates_input() {
        assert!(RESPONSES[1].contains(INPUT_PLACEHOLDER));
        let text = RESPONSES[1].replace(INPUT_PLACEHOLDER, "c.68_69delAG");
        assert!(text.contains("(c.68_69delAG)"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_waits_for_delay() {
        let generator = CannedReplies::with_seed(Duration::from_millis(1000), 1);
        let started = tokio::time::Instant::now();
        generator.generate(&request("x")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(1000));
    }
}
