//! Job parameter resolution.

use crate::events::{BuildEvent, EventSink};
use jerkins_core::{Error, ParamKey, ParameterSet, Result, VersionControl};
use std::sync::Arc;

/// Fills empty `branch` and `tag` parameters from the working copy.
///
/// Explicit values are never overwritten and unrecognized names are left
/// alone, even when empty.
pub struct ParameterResolver {
    vcs: Arc<dyn VersionControl>,
    sink: Arc<dyn EventSink>,
}

impl ParameterResolver {
    pub fn new(vcs: Arc<dyn VersionControl>, sink: Arc<dyn EventSink>) -> Self {
        Self { vcs, sink }
    }

    /// Resolve every empty recognized parameter.
    ///
    /// The current branch is queried before anything else so a broken working
    /// copy fails the whole resolution. The short commit id is only queried
    /// when an empty `tag` is declared, and always for the branch the build
    /// will run on: an explicit `branch` value if there is one, otherwise the
    /// current branch.
    pub async fn resolve(&self, mut params: ParameterSet) -> Result<ParameterSet> {
        let current = self
            .vcs
            .current_branch()
            .await
            .map_err(Error::Resolution)?;

        let target_branch = params
            .iter()
            .find(|p| p.key() == ParamKey::Branch && !p.is_unset())
            .map(|p| p.value.clone())
            .unwrap_or_else(|| current.clone());

        let mut short_id: Option<String> = None;

        for param in params.iter_mut().filter(|p| p.is_unset()) {
            let value = match param.key() {
                ParamKey::Branch => current.clone(),
                ParamKey::Tag => match &short_id {
                    Some(id) => id.clone(),
                    None => {
                        let id = self
                            .vcs
                            .short_commit_id(&target_branch)
                            .await
                            .map_err(Error::Resolution)?;
                        short_id = Some(id.clone());
                        id
                    }
                },
                ParamKey::Other(_) => continue,
            };

            self.sink.emit(BuildEvent::ParameterResolved {
                name: param.name.clone(),
                value: value.clone(),
            });
            param.value = value;
        }

        Ok(params)
    }
}
