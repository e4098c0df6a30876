use anyhow::Result;
use tracing::info;

use crate::error::RazorError;

/// Ordered pool of RPC endpoint URLs. The current endpoint is handed to the
/// trade API as a request parameter; on failure the pointer advances to the
/// next entry, wrapping around. No health state is kept.
#[derive(Debug, Clone)]
pub struct RpcEndpointPool {
    endpoints: Vec<String>,
    current: usize,
}

impl RpcEndpointPool {
    pub fn new(endpoints: Vec<String>) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(RazorError::ConfigError("RPC endpoint pool is empty".to_string()).into());
        }
        Ok(Self {
            endpoints,
            current: 0,
        })
    }

    pub fn current(&self) -> &str {
        &self.endpoints[self.current]
    }

    /// Advance to the next endpoint, wrapping around the pool.
    pub fn rotate(&mut self) -> &str {
        self.current = (self.current + 1) % self.endpoints.len();
        let endpoint = &self.endpoints[self.current];
        info!("Rotating to RPC endpoint: {}", endpoint);
        endpoint
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> RpcEndpointPool {
        RpcEndpointPool::new((0..n).map(|i| format!("https://rpc{}.example", i)).collect())
            .unwrap()
    }

    #[test]
    fn test_empty_pool_is_rejected() {
        assert!(RpcEndpointPool::new(Vec::new()).is_err());
    }

    #[test]
    fn test_rotation_visits_full_pool_before_repeating() {
        let mut pool = pool(3);
        let first = pool.current().to_string();

        let mut seen = vec![first.clone()];
        for _ in 0..2 {
            seen.push(pool.rotate().to_string());
        }
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 3);

        // One more rotation wraps back to the starting endpoint
        assert_eq!(pool.rotate(), first);
    }

    #[test]
    fn test_single_endpoint_keeps_rotating_to_itself() {
        let mut pool = pool(1);
        let only = pool.current().to_string();
        assert_eq!(pool.rotate(), only);
        assert_eq!(pool.rotate(), only);
    }
}
