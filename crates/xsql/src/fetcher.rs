//! Fetcher: single and multi-row hydration over one cursor
//!
//! A fetcher owns its cursor and is consumed by whichever operation runs, so
//! a cursor is drained exactly once and cannot be shared between calls.

use crate::config::CoercionConfig;
use crate::cursor::Cursor;
use crate::error::{FetchError, FetchResult};
use crate::record::{map_row, Record};
use crate::row::{collect_rows, Row};

/// Hydrates records from a single cursor
#[derive(Debug)]
pub struct Fetcher<C> {
    cursor: C,
    config: CoercionConfig,
}

impl<C: Cursor> Fetcher<C> {
    pub fn new(cursor: C) -> Self {
        Self::with_config(cursor, CoercionConfig::default())
    }

    pub fn with_config(cursor: C, config: CoercionConfig) -> Self {
        Self { cursor, config }
    }

    pub fn config(&self) -> &CoercionConfig {
        &self.config
    }

    /// Drain the cursor into row snapshots
    pub fn rows(self) -> FetchResult<Vec<Row>> {
        collect_rows(self.cursor)
    }

    /// Populate `dest` from the first row.
    ///
    /// Fails with [`FetchError::EmptyResult`] on a zero-row result, leaving
    /// `dest` untouched.
    pub fn first<T: Record>(self, dest: &mut T) -> FetchResult<()> {
        let config = self.config;
        let rows = collect_rows(self.cursor)?;
        let Some(row) = rows.first() else {
            tracing::debug!("First on an empty result set");
            return Err(FetchError::EmptyResult);
        };

        map_row(dest, row, &config)
    }

    /// Append one new record per row to `dest`.
    ///
    /// Either every row is appended or, on error, none are.
    pub fn find<T: Record>(self, dest: &mut Vec<T>) -> FetchResult<()> {
        let config = self.config;
        let rows = collect_rows(self.cursor)?;

        let mut items = Vec::with_capacity(rows.len());
        for (index, row) in rows.iter().enumerate() {
            let mut item = T::default();
            if let Err(e) = map_row(&mut item, row, &config) {
                tracing::debug!("Mapping row {} failed: {}", index, e);
                return Err(e);
            }
            items.push(item);
        }

        dest.append(&mut items);
        Ok(())
    }

    /// Hydrate the first row into a fresh record
    pub fn one<T: Record>(self) -> FetchResult<T> {
        let mut item = T::default();
        self.first(&mut item)?;
        Ok(item)
    }

    /// Hydrate every row into fresh records
    pub fn all<T: Record>(self) -> FetchResult<Vec<T>> {
        let mut items = Vec::new();
        self.find(&mut items)?;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coerce::TypedValue;
    use crate::cursor::MemoryCursor;
    use crate::record::{Coerce, FieldDescriptor};
    use crate::value::Scalar;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Tag {
        id: u32,
        label: String,
    }

    impl Record for Tag {
        fn fields() -> Vec<FieldDescriptor<Self>> {
            vec![
                FieldDescriptor::new("id", "id", |r: &mut Self, v: &TypedValue<'_>| {
                    r.id = Coerce::coerce(v)?;
                    Ok(())
                }),
                FieldDescriptor::new("label", "label", |r: &mut Self, v: &TypedValue<'_>| {
                    r.label = Coerce::coerce(v)?;
                    Ok(())
                }),
            ]
        }
    }

    fn tags_cursor() -> MemoryCursor {
        MemoryCursor::new(["id", "label"])
            .with_row([Scalar::U32(1), Scalar::from("red")])
            .with_row([Scalar::U32(2), Scalar::from("blue")])
    }

    #[test]
    fn test_first_uses_first_row() {
        let mut tag = Tag::default();
        Fetcher::new(tags_cursor()).first(&mut tag).unwrap();
        assert_eq!(tag, Tag { id: 1, label: "red".to_string() });
    }

    #[test]
    fn test_first_on_empty_result() {
        let mut tag = Tag { id: 9, label: "keep".to_string() };
        let err = Fetcher::new(MemoryCursor::new(["id", "label"]))
            .first(&mut tag)
            .unwrap_err();

        assert!(err.is_empty_result());
        assert_eq!(tag, Tag { id: 9, label: "keep".to_string() });
    }

    #[test]
    fn test_find_appends_in_order() {
        let mut tags = vec![Tag { id: 0, label: "seed".to_string() }];
        Fetcher::new(tags_cursor()).find(&mut tags).unwrap();

        let labels: Vec<&str> = tags.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["seed", "red", "blue"]);
    }

    #[test]
    fn test_find_on_empty_result() {
        let tags: Vec<Tag> = Fetcher::new(MemoryCursor::new(["id"])).all().unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_rows_and_one() {
        let rows = Fetcher::new(tags_cursor()).rows().unwrap();
        assert_eq!(rows.len(), 2);

        let tag: Tag = Fetcher::new(tags_cursor()).one().unwrap();
        assert_eq!(tag.id, 1);
    }
}
