use resource_handler_core::{Failure, TaggingClient, Tags};
use std::collections::{BTreeSet, VecDeque};

#[derive(Debug, Clone, PartialEq)]
pub enum TagCall {
    Untag(String, BTreeSet<String>),
    Tag(String, Tags),
}

/// In-memory tagging client that records every call and replays scripted
/// failures in order
#[derive(Debug, Default)]
pub struct MockTaggingClient {
    pub calls: Vec<TagCall>,
    pub current: Tags,
    failures: VecDeque<Option<Failure>>,
}

impl MockTaggingClient {
    pub fn new(current: Tags) -> Self {
        Self {
            current,
            ..Default::default()
        }
    }

    /// Outcome of the next call; `None` succeeds
    pub fn script(mut self, outcome: Option<Failure>) -> Self {
        self.failures.push_back(outcome);
        self
    }

    fn next_outcome(&mut self) -> Result<(), Failure> {
        match self.failures.pop_front().flatten() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }
}

impl TaggingClient for MockTaggingClient {
    fn untag_resource(&mut self, resource_id: &str, keys: &BTreeSet<String>) -> Result<(), Failure> {
        self.calls
            .push(TagCall::Untag(resource_id.to_string(), keys.clone()));
        self.next_outcome()?;
        self.current.retain(|key, _| !keys.contains(key));
        Ok(())
    }

    fn tag_resource(&mut self, resource_id: &str, tags: &Tags) -> Result<(), Failure> {
        self.calls
            .push(TagCall::Tag(resource_id.to_string(), tags.clone()));
        self.next_outcome()?;
        self.current
            .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}
