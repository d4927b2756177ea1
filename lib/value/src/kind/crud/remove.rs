//! All code related to removing from a [`Kind`].

use crate::kind::collection::{CollectionRemove, EmptyState};
use crate::kind::{Collection, Field};
use crate::Kind;
use lookup::lookup_v2::OwnedSegment;
use lookup::OwnedValuePath;

impl Kind {
    /// Removes the `Kind` at the given `path` within `self`.
    /// This has the same behavior as `Value::remove`.
    #[allow(clippy::return_self_not_must_use)] // It is fine to ignore the output here
    pub fn remove(&mut self, path: &OwnedValuePath, prune: bool) -> Self {
        let removed_type = self.get(path);

        let segments = &path.segments;
        if segments.is_empty() {
            let mut new_kind = Self::never();
            if self.contains_object() {
                new_kind.add_object(Collection::empty());
            }
            if self.contains_array() {
                new_kind.add_array(Collection::empty());
            }
            if self.contains_primitive() {
                // non-collection types are set to null when deleted at the root
                new_kind.add_null();
            }
            *self = new_kind;
        } else {
            let _compact_options = self.remove_inner(segments, prune);
        }
        removed_type
    }

    #[allow(clippy::too_many_lines)]
    fn remove_inner(&mut self, segments: &[OwnedSegment], compact: bool) -> CompactOptions {
        if self.is_never() {
            // If `self` is `never`, the program would have already terminated
            // so this removal can't happen.
            *self = Self::never();
            return CompactOptions::Never;
        }

        if let Some(first) = segments.first() {
            match first {
                OwnedSegment::Field(field) => {
                    let mut at_path_kind = self.at_path(segments);

                    self.as_object_mut()
                        .map_or(CompactOptions::Never, |object| {
                            // The modified value is discarded here (It's not needed)
                            object
                                .known_mut()
                                .get_mut(&Field::from(field.clone()))
                                .unwrap_or(&mut at_path_kind)
                                .remove_inner(&segments[1..], compact)
                                .compact(object, field.clone(), compact)
                        })
                }

                OwnedSegment::Index(index) => {
                    let mut at_path_kind = self.at_path(segments);
                    if let Some(array) = self.as_array_mut() {
                        let mut index = *index;
                        if index < 0 {
                            let negative_index = (-index) as usize;

                            if array.unknown_kind().contains_any_defined() {
                                let original = array.clone();
                                *array = original.clone();

                                let min_index = array
                                    .largest_known_index()
                                    .map_or(0, |x| x + 1 - negative_index);

                                if let Some(largest_known_index) = array.largest_known_index() {
                                    for i in min_index..=largest_known_index {
                                        let mut single_remove = original.clone();
                                        if let Some(child) =
                                            single_remove.known_mut().get_mut(&i.into())
                                        {
                                            child.remove_inner(&segments[1..], compact).compact(
                                                &mut single_remove,
                                                i,
                                                compact,
                                            );
                                        }
                                        array.merge(single_remove, false);
                                    }
                                }
                                return if array.min_length() <= 1 {
                                    CompactOptions::Maybe
                                } else {
                                    CompactOptions::Never
                                };
                            } else if let Some(positive_index) = array.get_positive_index(index) {
                                index = positive_index as isize;
                            } else {
                                // Removing a non-existing index
                                return CompactOptions::from(EmptyState::Never);
                            }
                        }

                        // The modified value is discarded here (It's not needed)
                        array
                            .known_mut()
                            .get_mut(&(index as usize).into())
                            .unwrap_or(&mut at_path_kind)
                            .remove_inner(&segments[1..], compact)
                            .compact(array, index as usize, compact)
                    } else {
                        // guaranteed to not delete anything
                        CompactOptions::Never
                    }
                }
                OwnedSegment::Coalesce(fields) => {
                    let original = self.clone();

                    #[allow(clippy::option_if_let_else)] // false positive due to lifetime issues
                    if let Some(object) = self.as_object_mut() {
                        let mut output = Self::never();

                        let mut compact_options = None;

                        for field in fields {
                            let field_kind =
                                original.at_path([OwnedSegment::Field(field.to_string())].as_ref());

                            if field_kind.contains_any_defined() {
                                let mut child_kind = original.clone();
                                let mut child_segments = segments.to_vec();
                                child_segments[0] = OwnedSegment::Field(field.clone());

                                let child_compact_options = child_kind
                                    .remove_inner(&child_segments, compact)
                                    .compact(object, field.to_string(), compact);

                                compact_options = Some(compact_options.map_or(
                                    child_compact_options,
                                    |compact_options: CompactOptions| {
                                        compact_options.or(child_compact_options)
                                    },
                                ));
                                output = output.union(child_kind);

                                if !field_kind.contains_undefined() {
                                    // No other field will be visited, so return early
                                    break;
                                }
                            }
                        }
                        *self = output;
                        compact_options.unwrap_or(CompactOptions::Never)
                    } else {
                        // guaranteed to not delete anything
                        CompactOptions::Never
                    }
                }
            }
        } else {
            CompactOptions::new(self.contains_any_defined(), self.contains_undefined())
        }
    }
}

/// A type definition might not know for sure if compaction will occur or not, so this
/// keeps track of the current state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum CompactOptions {
    /// Compaction will always happen.
    Always,
    /// Compaction may or may not happen. Both possibilities should be merged together.
    Maybe,
    /// Compaction will never happen.
    Never,
}

impl CompactOptions {
    fn new(compact: bool, dont_compact: bool) -> Self {
        match (compact, dont_compact) {
            (true, false) => Self::Always,
            (false, true) => Self::Never,
            (true, true) => Self::Maybe,
            (false, false) => unreachable!("Invalid CompactOptions"),
        }
    }

    fn compact<T>(
        self,
        collection: &mut Collection<T>,
        key: impl Into<T>,
        continue_compact: bool,
    ) -> Self
    where
        T: Ord + Clone + std::fmt::Debug,
        Collection<T>: CollectionRemove<Key = T>,
    {
        let key = &key.into();

        match self {
            Self::Always => collection.remove_known(key),
            Self::Maybe => {
                let not_compacted = collection.clone();
                collection.remove_known(key);
                collection.merge(not_compacted, false);
            }
            Self::Never => {
                // do nothing, already correct}
            }
        }

        Self::from(collection.is_empty())
            .disable_should_compact(!self.should_compact())
            .disable_should_compact(!continue_compact)
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn should_compact(&self) -> bool {
        match self {
            Self::Always | Self::Maybe => true,
            Self::Never => false,
        }
    }

    #[allow(clippy::trivially_copy_pass_by_ref)]
    fn should_not_compact(&self) -> bool {
        match self {
            Self::Always => false,
            Self::Maybe | Self::Never => true,
        }
    }

    /// Combines two sets of options. Each setting is "or"ed together.
    fn or(self, other: Self) -> Self {
        Self::new(
            self.should_compact() || other.should_compact(),
            self.should_not_compact() || other.should_not_compact(),
        )
    }

    /// If the value is true, the `should_compact` option is set to false.
    fn disable_should_compact(self, value: bool) -> Self {
        if value {
            Self::Never
        } else {
            self
        }
    }
}

impl From<EmptyState> for CompactOptions {
    fn from(state: EmptyState) -> Self {
        match state {
            EmptyState::Never => Self::Never,
            EmptyState::Maybe => Self::Maybe,
            EmptyState::Always => Self::Always,
        }
    }
}
