use rand::seq::SliceRandom;
use rand::Rng;

/// Fallback when the configured user-agent set is empty.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fingerprint configuration for a browser session
#[derive(Debug, Clone)]
pub struct FingerprintConfig {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl FingerprintConfig {
    /// Pick a user agent from `user_agents` and a common desktop viewport at random
    pub fn randomized_from(user_agents: &[String]) -> Self {
        let mut rng = rand::thread_rng();

        // Common viewport sizes
        let viewports = [(1920, 1080), (1366, 768), (1536, 864), (1440, 900)];
        let (width, height) = viewports[rng.gen_range(0..viewports.len())];

        let user_agent = user_agents
            .choose(&mut rng)
            .map_or_else(|| DEFAULT_USER_AGENT.to_string(), Clone::clone);

        Self {
            user_agent,
            viewport_width: width,
            viewport_height: height,
        }
    }

    /// Keep the chosen user agent but force a viewport
    #[must_use]
    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }
}
