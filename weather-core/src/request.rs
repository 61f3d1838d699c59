/// Identifier of one request issued for a UI region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

/// Tracks the latest request issued for one independently updated region.
///
/// Responses are applied only when their id is still the latest; older
/// in-flight responses are dropped.
#[derive(Debug, Default)]
pub struct RequestRegion {
    latest: u64,
}

impl RequestRegion {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn issue(&mut self) -> RequestId {
        self.latest += 1;
        RequestId(self.latest)
    }

    pub fn is_latest(&self, id: RequestId) -> bool {
        id.0 == self.latest
    }
}
