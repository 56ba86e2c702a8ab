//! Core resolution algorithm: depth-first search with backtracking.
//!
//! The search keeps three pieces of state: the versions chosen so far, the
//! versions still permitted for libraries that have been constrained but not
//! chosen, and a worklist of libraries still to decide. Each library is tried
//! newest version first. A version whose requirements clash with an earlier
//! choice, or that leaves some library with no permitted version, is dropped
//! and the next older one is tried. The first complete assignment wins.
//!
//! Every branch works on its own copy of the state, so abandoning a branch
//! needs no undo step. A library leaves the worklist the moment it is chosen
//! and never returns, which is what makes cyclic graphs terminate.
//!
//! Decided libraries are kept on an explicit stack of frames rather than the
//! call stack, so the number of libraries in a resolution is bounded by
//! memory only.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use miette::Diagnostic;
use semver::Version;
use thiserror::Error;

use crate::config::{CancelFlag, ResolverConfig};
use crate::constraints::{Available, Configuration};
use crate::graph::{DependencyGraph, LibraryName};
use crate::version::VersionSet;

/// Why a resolution, or one branch of it, failed.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolutionError {
    /// A candidate requires a version of `dependency_name` other than the one already chosen.
    #[error("`{dependency_name}` is fixed at {chosen}, which is outside the required {permitted}")]
    #[diagnostic(code(impact::incompatible))]
    IncompatibleWithChosen {
        dependency_name: LibraryName,
        chosen: Version,
        permitted: VersionSet,
    },

    /// Every candidate version of a library was tried and failed.
    #[error("no candidate version of `{library_name}` works ({tried} tried)")]
    #[diagnostic(code(impact::exhausted))]
    ExhaustedCandidates {
        library_name: LibraryName,
        tried: usize,
        /// Failure of the last candidate tried.
        #[source]
        cause: Box<ResolutionError>,
    },

    /// The library has no known or no remaining candidate version.
    #[error("no versions of `{library_name}` are available")]
    #[diagnostic(
        code(impact::no_versions),
        help("Register its versions with `add_version` or `add_edge` before resolving")
    )]
    NoVersionsAvailable { library_name: LibraryName },

    /// Merging new requirements left these libraries with no permitted version.
    #[error("no compatible versions left for {}", join_names(.library_names))]
    #[diagnostic(code(impact::starved))]
    Starved { library_names: Vec<LibraryName> },

    #[error("resolution was cancelled")]
    #[diagnostic(code(impact::cancelled))]
    Cancelled,

    #[error("resolution did not finish within {timeout:?}")]
    #[diagnostic(code(impact::deadline))]
    DeadlineExceeded { timeout: Duration },

    #[error("resolution gave up after {limit} candidate attempts")]
    #[diagnostic(code(impact::attempt_limit))]
    AttemptLimitExceeded { limit: usize },
}

impl ResolutionError {
    /// The innermost failure behind a chain of exhausted libraries.
    pub fn root_cause(&self) -> &ResolutionError {
        let mut err = self;
        while let ResolutionError::ExhaustedCandidates { cause, .. } = err {
            err = cause;
        }
        err
    }

    /// Whether the search was stopped from outside rather than failing on its own.
    ///
    /// Aborts are never answered by trying another candidate.
    pub fn is_abort(&self) -> bool {
        matches!(
            self,
            ResolutionError::Cancelled
                | ResolutionError::DeadlineExceeded { .. }
                | ResolutionError::AttemptLimitExceeded { .. }
        )
    }
}

fn join_names<'a>(names: impl IntoIterator<Item = &'a LibraryName>) -> String {
    names
        .into_iter()
        .map(LibraryName::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Per-call bookkeeping for limits and cancellation.
struct Search<'a> {
    started: Instant,
    attempts: usize,
    config: &'a ResolverConfig,
    cancel: Option<&'a CancelFlag>,
}

impl<'a> Search<'a> {
    fn new(config: &'a ResolverConfig, cancel: Option<&'a CancelFlag>) -> Self {
        Self {
            started: Instant::now(),
            attempts: 0,
            config,
            cancel,
        }
    }

    /// Called before every candidate attempt.
    fn checkpoint(&mut self) -> Result<(), ResolutionError> {
        if self.cancel.is_some_and(CancelFlag::is_cancelled) {
            return Err(ResolutionError::Cancelled);
        }
        if let Some(timeout) = self.config.timeout() {
            if self.started.elapsed() >= timeout {
                return Err(ResolutionError::DeadlineExceeded { timeout });
            }
        }
        if let Some(limit) = self.config.max_attempts {
            if self.attempts >= limit {
                return Err(ResolutionError::AttemptLimitExceeded { limit });
            }
        }
        self.attempts += 1;
        Ok(())
    }
}

/// Libraries still to decide, front first.
type Worklist = im::Vector<LibraryName>;

/// What the search knows before deciding the next library.
struct State {
    assignment: Configuration,
    constraints: Available,
    worklist: Worklist,
}

/// A library being decided.
struct Frame {
    library: LibraryName,
    /// Version currently being tried.
    trying: Version,
    /// Untried candidates, newest first.
    remaining: std::vec::IntoIter<Version>,
    tried: usize,
    /// State before `library` was chosen, reused by every candidate.
    state: State,
}

/// Outcome of picking the next library off the worklist.
enum Descent {
    Complete(Configuration),
    Choose(Frame),
}

/// Resolves library names against a [`DependencyGraph`].
///
/// The resolver holds no state between calls and can be reused.
pub struct Resolver<'g> {
    graph: &'g DependencyGraph,
    config: ResolverConfig,
    cancel: Option<CancelFlag>,
}

impl<'g> Resolver<'g> {
    pub fn new(graph: &'g DependencyGraph) -> Self {
        Self {
            graph,
            config: ResolverConfig::default(),
            cancel: None,
        }
    }

    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = config;
        self
    }

    /// Stop the search once `flag` is cancelled.
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Choose one version for every library in `names` and everything they
    /// transitively require.
    pub fn resolve<I>(&self, names: I) -> Result<Configuration, ResolutionError>
    where
        I: IntoIterator,
        I::Item: Into<LibraryName>,
    {
        let mut worklist = Worklist::new();
        for name in names {
            let name = name.into();
            if !worklist.contains(&name) {
                worklist.push_back(name);
            }
        }
        tracing::debug!("Resolving {}", join_names(&worklist));

        let mut search = Search::new(&self.config, self.cancel.as_ref());
        let result = self.resolve_from(
            &mut search,
            State {
                assignment: Configuration::new(),
                constraints: Available::new(),
                worklist,
            },
        );
        match &result {
            Ok(config) => tracing::debug!(
                "Resolved {} libraries after {} attempts",
                config.len(),
                search.attempts
            ),
            Err(e) => tracing::debug!("Resolution failed after {} attempts: {e}", search.attempts),
        }
        result
    }

    fn resolve_from(
        &self,
        search: &mut Search<'_>,
        mut state: State,
    ) -> Result<Configuration, ResolutionError> {
        // Libraries with a version fixed, innermost last.
        let mut decided: Vec<Frame> = Vec::new();
        loop {
            let mut frame = match self.descend(state) {
                Ok(Descent::Complete(assignment)) => return Ok(assignment),
                Ok(Descent::Choose(frame)) => frame,
                Err(e) => backtrack(&mut decided, e)?,
            };
            state = loop {
                search.checkpoint()?;
                frame.tried += 1;
                tracing::trace!("Trying {}@{}", frame.library, frame.trying);

                match self.try_candidate(&frame) {
                    Ok(next) => break next,
                    Err(e) => {
                        decided.push(frame);
                        frame = backtrack(&mut decided, e)?;
                    }
                }
            };
            decided.push(frame);
        }
    }

    /// Pop the next undecided library and line up its candidates.
    fn descend(&self, state: State) -> Result<Descent, ResolutionError> {
        let State {
            assignment,
            constraints,
            mut worklist,
        } = state;
        tracing::trace!(
            "assignment = {assignment}, constraints = {constraints}, worklist = [{}]",
            join_names(&worklist)
        );

        let library = loop {
            match worklist.pop_front() {
                None => return Ok(Descent::Complete(assignment)),
                Some(name) if assignment.contains(name.as_str()) => continue,
                Some(name) => break name,
            }
        };

        let candidates = match constraints.get(library.as_str()) {
            Some(permitted) => permitted.descending().cloned().collect::<Vec<_>>(),
            None => self
                .graph
                .versions_of(library.as_str())
                .descending()
                .cloned()
                .collect(),
        };
        let mut remaining = candidates.into_iter();
        let Some(trying) = remaining.next() else {
            return Err(ResolutionError::NoVersionsAvailable {
                library_name: library,
            });
        };

        Ok(Descent::Choose(Frame {
            library,
            trying,
            remaining,
            tried: 0,
            state: State {
                assignment,
                constraints,
                worklist,
            },
        }))
    }

    /// Fix the frame's library at the version it is trying, on a copy of the
    /// state, and return the state to continue from.
    fn try_candidate(&self, frame: &Frame) -> Result<State, ResolutionError> {
        let Frame {
            library,
            trying: version,
            state,
            ..
        } = frame;
        let mut candidate = state.assignment.clone();
        let mut required: BTreeMap<LibraryName, VersionSet> =
            self.graph.dependencies_of(library.as_str(), version);

        // A self-requirement must accept the version being tried.
        if let Some(permitted) = required.remove(library.as_str()) {
            if !permitted.contains(version) {
                return Err(ResolutionError::IncompatibleWithChosen {
                    dependency_name: library.clone(),
                    chosen: version.clone(),
                    permitted,
                });
            }
        }

        for (dependency, permitted) in &required {
            if let Some(chosen) = candidate.get(dependency.as_str()) {
                if !permitted.contains(chosen) {
                    return Err(ResolutionError::IncompatibleWithChosen {
                        dependency_name: dependency.clone(),
                        chosen: chosen.clone(),
                        permitted: permitted.clone(),
                    });
                }
            }
        }

        required.retain(|name, _| !candidate.contains(name.as_str()));

        let new_names: Vec<LibraryName> = required
            .keys()
            .filter(|name| !state.worklist.contains(name))
            .cloned()
            .collect();

        let mut next = state.constraints.merge(&required);
        next.remove(library.as_str());

        // Sets outside `required` were non-empty before the merge and are unchanged.
        let starved: Vec<LibraryName> = required
            .keys()
            .filter(|name| next.get(name.as_str()).is_some_and(VersionSet::is_empty))
            .cloned()
            .collect();
        if !starved.is_empty() {
            return Err(ResolutionError::Starved {
                library_names: starved,
            });
        }

        candidate.insert(library.clone(), version.clone());

        let mut worklist = state.worklist.clone();
        for name in new_names.into_iter().rev() {
            worklist.push_front(name);
        }
        Ok(State {
            assignment: candidate,
            constraints: next,
            worklist,
        })
    }
}

/// Charge `failure` to the innermost decided library and move it on to its
/// next candidate. A library with no candidates left fails in turn, wrapping
/// the failure, to the library decided before it.
fn backtrack(
    decided: &mut Vec<Frame>,
    mut failure: ResolutionError,
) -> Result<Frame, ResolutionError> {
    while let Some(mut frame) = decided.pop() {
        tracing::debug!("Rejected {}@{}: {failure}", frame.library, frame.trying);
        if let Some(next) = frame.remaining.next() {
            frame.trying = next;
            return Ok(frame);
        }
        failure = ResolutionError::ExhaustedCandidates {
            library_name: frame.library,
            tried: frame.tried,
            cause: Box::new(failure),
        };
    }
    Err(failure)
}
