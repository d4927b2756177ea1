//! All types related to finding a [`Kind`] nested into another one.

use std::{borrow::Cow, collections::VecDeque};

use lookup::lookup_v2::{BorrowedSegment, Path};
use lookup::{Field, Lookup, Segment};

use super::Kind;
use crate::kind::merge;

/// The list of errors that can occur when `remove_at_path` fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The error variant triggered by a negative index in the path.
    NegativeIndexPath,
}

impl Kind {
    /// Find the [`Kind`] at the given path.
    ///
    /// If the path points to root, then `self` is returned, otherwise `None` is returned if `Kind`
    /// isn't an object or array. If the path points to a non-existing element in an existing collection,
    /// then the collection's `unknown` `Kind` variant is returned.
    ///
    /// # Errors
    ///
    /// Returns an error when the path contains negative indexing segments (e.g. `.foo[-2]`). This
    /// is currently not supported.
    #[allow(clippy::too_many_lines)]
    pub fn find_at_path<'a>(
        &'a self,
        path: &'a Lookup<'a>,
    ) -> Result<Option<Cow<'a, Self>>, Error> {
        enum InnerKind<'a> {
            Exact(&'a Kind),
            Infinite(Kind),
        }

        use Cow::{Borrowed, Owned};

        // This recursively tries to get the field within a `Kind`'s object.
        //
        // It returns `None` if:
        //
        // - The provided `Kind` isn't an object.
        // - The `Kind`'s object does not contain a known field matching `field` *and* its unknown
        // fields either aren't an object, or they (recursively) don't match these two rules.
        fn get_field_from_object<'a>(
            kind: &'a Kind,
            field: &'a Field<'a>,
        ) -> Option<InnerKind<'a>> {
            kind.object.as_ref().and_then(|collection| {
                collection
                    .known()
                    .get(&(field.into()))
                    .map(InnerKind::Exact)
                    .or_else(|| {
                        collection.unknown().as_ref().and_then(|unknown| {
                            unknown
                                .as_exact()
                                .map(InnerKind::Exact)
                                .or_else(|| Some(InnerKind::Infinite(unknown.to_kind())))
                        })
                    })
            })
        }

        // This recursively tries to get the index within a `Kind`'s array.
        //
        // It returns `None` if:
        //
        // - The provided `Kind` isn't an array.
        // - The `Kind`'s array does not contain a known index matching `index` *and* its unknown
        // indices either aren't an array, or they (recursively) don't match these two rules.
        fn get_element_from_array(kind: &Kind, index: usize) -> Option<InnerKind<'_>> {
            kind.array.as_ref().and_then(|collection| {
                collection
                    .known()
                    .get(&(index.into()))
                    .map(InnerKind::Exact)
                    .or_else(|| {
                        collection.unknown().as_ref().and_then(|unknown| {
                            unknown
                                .as_exact()
                                .map(InnerKind::Exact)
                                .or_else(|| Some(InnerKind::Infinite(unknown.to_kind())))
                        })
                    })
            })
        }

        if path.is_root() {
            return Ok(Some(Borrowed(self)));
        }

        // While iterating through the path segments, one or more segments might point to a `Kind`
        // that has more than one state defined. In such a case, there is no way of knowing whether
        // we're going to see the expected collection state at runtime, so we need to take into
        // account the fact that the traversal might not succeed, and thus return `null`.
        let mut or_null = false;

        let mut kind = self;
        let mut iter = path.iter().peekable();

        while let Some(segment) = iter.next() {
            if !kind.is_exact() {
                or_null = true;
            }

            kind = match segment {
                // Try finding the field in the existing object.
                Segment::Field(field) => match get_field_from_object(kind, field) {
                    None => return Ok(None),

                    Some(InnerKind::Exact(kind)) => kind,

                    // We're dealing with an infinite recursive type, so there's no need to
                    // further expand on the path.
                    Some(InnerKind::Infinite(kind)) => {
                        return Ok(Some(Owned(if or_null { kind.or_null() } else { kind })))
                    }
                },

                Segment::Coalesce(fields) => {
                    let mut merged_kind = Self::never();

                    for field in fields {
                        let mut segments = iter.clone().cloned().collect::<VecDeque<_>>();
                        segments.push_front(Segment::Field(field.clone()));
                        let path = Lookup::from(segments);

                        match kind.find_at_path(&path)? {
                            None => {
                                merged_kind.add_null();
                            }
                            Some(kind) => {
                                let non_null = !kind.contains_null();

                                // If this `Kind` cannot be null, then the entire coalesced segment
                                // will never be null, so we have to remove any reference to it.
                                if non_null {
                                    // if the type is empty after removing null, we deal with it at the end.
                                    merged_kind.remove_null();
                                }

                                merged_kind.merge(
                                    kind.into_owned(),
                                    merge::Strategy {
                                        collisions: merge::CollisionStrategy::Union,
                                        indices: merge::Indices::Keep,
                                    },
                                );

                                // Additionally, we can abort the loop, as this variant will
                                // _always_ match at runtime.
                                if non_null {
                                    break;
                                }
                            }
                        };
                    }

                    return Ok(if merged_kind.is_never() {
                        None
                    } else {
                        Some(Cow::Owned(merged_kind))
                    });
                }

                // Try finding the index in the existing array.
                Segment::Index(index) => {
                    match get_element_from_array(
                        kind,
                        usize::try_from(*index).map_err(|_| Error::NegativeIndexPath)?,
                    ) {
                        None => return Ok(None),
                        Some(InnerKind::Exact(kind)) => kind,
                        Some(InnerKind::Infinite(kind)) => {
                            return Ok(Some(Owned(if or_null { kind.or_null() } else { kind })))
                        }
                    }
                }
            };
        }

        Ok(Some(if or_null {
            Owned(kind.clone().or_null())
        } else {
            Borrowed(kind)
        }))
    }

    /// Insert the `Kind` at the given `path` within `self`.
    /// This has the same behavior as `Value::get`.
    pub fn get<'a>(&self, path: impl Path<'a>) -> Kind {
        self.get_recursive(path.segment_iter())
    }

    fn get_field<'a>(&self, field: Cow<'a, str>) -> Kind {
        if let Some(object) = self.as_object() {
            let mut kind = object
                .known()
                .get(&field.into_owned().into())
                .cloned()
                .unwrap_or_else(|| object.unknown_kind());

            if !self.is_exact() {
                kind = kind.or_undefined();
            }
            kind
        } else {
            Kind::undefined()
        }
    }

    fn get_recursive<'a>(
        &self,
        mut iter: impl Iterator<Item = BorrowedSegment<'a>> + Clone,
    ) -> Kind {
        if self.is_never() {
            // a terminating expression by definition can "never" resolve to a value
            return Kind::never();
        }

        match iter.next() {
            Some(BorrowedSegment::Field(field)) | Some(BorrowedSegment::CoalesceEnd(field)) => {
                self.get_field(field).get_recursive(iter)
            }
            Some(BorrowedSegment::Index(mut index)) => {
                if let Some(array) = self.as_array() {
                    if index < 0 {
                        let largest_known_index = array.known().keys().map(|i| i.to_usize()).max();
                        // the minimum size of the resulting array
                        let len_required = -index as usize;

                        if array.unknown_kind().contains_any_defined() {
                            // the exact length is not known. We can't know for sure if the index
                            // will point to a known or unknown type, so the union of the unknown type
                            // plus any possible known type must be taken. Just the unknown type alone is not sufficient

                            // the array may be larger, but this is the largest we can prove the array is from the type information
                            let min_length = largest_known_index.map_or(0, |i| i + 1);

                            // We can prove the positive index won't be less than "min_index"
                            let min_index = (min_length as isize + index).max(0) as usize;
                            let can_underflow = (min_length as isize + index) < 0;

                            let mut kind = array.unknown_kind();

                            // We can prove the index won't underflow, so it cannot be "undefined".
                            // But only if the type can only be an array.
                            if self.is_exact() && !can_underflow {
                                kind.remove_undefined();
                            }

                            for (i, i_kind) in array.known() {
                                if i.to_usize() >= min_index {
                                    kind.merge_keep(i_kind.clone(), false);
                                }
                            }
                            return kind.get_recursive(iter);
                        } else {
                            // there are no unknown indices, so we can determine the exact positive index
                            let exact_len = largest_known_index.map_or(0, |x| x + 1);
                            if exact_len >= len_required {
                                // make the index positive, then continue below
                                index += exact_len as isize;
                            } else {
                                // out of bounds index
                                return Kind::undefined();
                            }
                        }
                    }

                    debug_assert!(index >= 0, "negative indices already handled");

                    let index = index as usize;
                    let mut kind = array
                        .known()
                        .get(&index.into())
                        .cloned()
                        .unwrap_or_else(|| array.unknown_kind());

                    if !self.is_exact() {
                        kind = kind.or_undefined();
                    }
                    kind.get_recursive(iter)
                } else {
                    Kind::undefined()
                }
            }
            Some(BorrowedSegment::CoalesceField(field)) => {
                let field_kind = self.get_field(field);

                // the remaining segments if this match succeeded
                let match_iter = iter
                    .clone()
                    .skip_while(|segment| matches!(segment, BorrowedSegment::CoalesceField(_)))
                    // skip the CoalesceEnd, which always exists after CoalesceFields
                    .skip(1)
                    // need to collect to prevent infinite recursive iterator type
                    .collect::<Vec<_>>();

                // This is the resulting type, assuming the match succeeded.
                let match_type = field_kind
                    .clone()
                    // This type is only valid if the match succeeded, which means this type wasn't undefined
                    .without_undefined()
                    .get_recursive(match_iter.into_iter());

                if !field_kind.contains_undefined() {
                    // this coalesce field will always be defined, so skip the others.
                    return match_type;
                }

                // the first field may or may not succeed. Try both.
                self.get_recursive(iter).union(match_type)
            }
            Some(BorrowedSegment::Invalid) => {
                // Value::get returns `None` in this case, which means the value is not defined
                Kind::undefined()
            }
            None => self.clone(),
        }
    }
}
