//! Ordered image gallery editing.
//!
//! A gallery is a sequence of [`ImageRecord`]s whose `priority` fields are
//! always exactly 1..=N in sequence order. Every operation takes the current
//! sequence and returns the complete new one; the owner is expected to
//! replace its copy wholesale rather than apply diffs, so re-applying the
//! last emitted sequence is always safe.

use crate::{
    model::ImageRecord,
    upload::{ImageStore, UploadError, UploadFile},
};

/// Which user-editable field of an [`ImageRecord`] to change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageField {
    Title(String),
    Description(String),
}

fn renumber(mut images: Vec<ImageRecord>) -> Vec<ImageRecord> {
    for (idx, image) in images.iter_mut().enumerate() {
        image.priority = idx as i64 + 1;
    }
    images
}

/// True if every record's `priority` equals its position + 1.
pub fn priorities_consistent(images: &[ImageRecord]) -> bool {
    images
        .iter()
        .enumerate()
        .all(|(idx, image)| image.priority == idx as i64 + 1)
}

/// Move the record at `index` to the 1-based rank `new_priority`.
///
/// The record is removed and reinserted at position `new_priority - 1` in
/// the remaining sequence, shifting everything in between by one place. This
/// is a single move, not a pairwise swap. A target outside 1..=N (or an
/// out-of-range index) leaves the sequence unchanged.
pub fn reorder(images: &[ImageRecord], index: usize, new_priority: i64) -> Vec<ImageRecord> {
    if index >= images.len() || new_priority < 1 || new_priority > images.len() as i64 {
        return images.to_vec();
    }
    let mut updated = images.to_vec();
    let moved = updated.remove(index);
    updated.insert(new_priority as usize - 1, moved);
    renumber(updated)
}

/// Swap the record at `index` with its predecessor; no-op when already first.
///
/// Passes the record's own current rank as the reorder target, which with
/// the remove-then-reinsert arithmetic of [`reorder`] nets out to an
/// adjacent swap. Kept in this form instead of a literal swap so the
/// primitive stays correct for multi-step moves.
pub fn move_up(images: &[ImageRecord], index: usize) -> Vec<ImageRecord> {
    if index == 0 {
        return images.to_vec();
    }
    reorder(images, index, index as i64)
}

/// Swap the record at `index` with its successor; no-op when already last.
pub fn move_down(images: &[ImageRecord], index: usize) -> Vec<ImageRecord> {
    if index + 1 >= images.len() {
        return images.to_vec();
    }
    reorder(images, index, index as i64 + 2)
}

/// Delete the record at `index` and renumber the remaining priorities.
pub fn remove(images: &[ImageRecord], index: usize) -> Vec<ImageRecord> {
    if index >= images.len() {
        return images.to_vec();
    }
    let mut updated = images.to_vec();
    updated.remove(index);
    renumber(updated)
}

/// Replace one editable field on the record at `index`. Order and priorities
/// are untouched.
pub fn edit_field(images: &[ImageRecord], index: usize, field: ImageField) -> Vec<ImageRecord> {
    if index >= images.len() {
        return images.to_vec();
    }
    let mut updated = images.to_vec();
    match field {
        ImageField::Title(title) => updated[index].title = title,
        ImageField::Description(description) => updated[index].description = description,
    }
    updated
}

/// Upload `file` through `store` and append the stored image at the end of
/// the sequence with priority N + 1.
///
/// The MIME type is checked before any network effect; a rejected or failed
/// upload commits nothing, the caller keeps its old sequence. The new
/// record's title defaults to the uploaded file's name.
pub async fn upload_and_append(
    store: &dyn ImageStore,
    images: &[ImageRecord],
    file: &UploadFile,
) -> Result<Vec<ImageRecord>, UploadError> {
    if !file.content_type.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            content_type: file.content_type.clone(),
        });
    }
    let url = store.store(file).await?;
    let mut updated = images.to_vec();
    updated.push(ImageRecord {
        url,
        title: file.file_name.clone(),
        description: String::new(),
        priority: images.len() as i64 + 1,
    });
    Ok(updated)
}

/// Upload several files strictly one after another: each upload fully
/// settles and, on success, is appended to the growing sequence before the
/// next one starts, so priorities follow input order regardless of per-file
/// latency. A failed file is skipped and its error collected; the remaining
/// files still go through, with priorities closing over the gap.
pub async fn upload_and_append_all(
    store: &dyn ImageStore,
    images: &[ImageRecord],
    files: &[UploadFile],
) -> (Vec<ImageRecord>, Vec<UploadError>) {
    let mut current = images.to_vec();
    let mut errors = Vec::new();
    for file in files {
        match upload_and_append(store, &current, file).await {
            Ok(updated) => current = updated,
            Err(err) => errors.push(err),
        }
    }
    (current, errors)
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use async_trait::async_trait;
    use claims::{assert_matches, assert_ok};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use tokio::sync::Mutex;

    use super::*;

    fn gallery(titles: &[&str]) -> Vec<ImageRecord> {
        renumber(
            titles
                .iter()
                .map(|title| ImageRecord {
                    url: format!("https://images.test/{}", title),
                    title: (*title).to_owned(),
                    description: String::new(),
                    priority: 0,
                })
                .collect(),
        )
    }

    fn titles(images: &[ImageRecord]) -> Vec<&str> {
        images.iter().map(|image| image.title.as_str()).collect()
    }

    #[test]
    fn reorder_moves_record_to_target_rank() {
        let images = gallery(&["A", "B", "C", "D"]);
        let updated = reorder(&images, 2, 1);
        assert_eq!(titles(&updated), ["C", "A", "B", "D"]);
        assert!(priorities_consistent(&updated));
    }

    #[test]
    fn reorder_out_of_range_target_is_a_noop() {
        let images = gallery(&["A", "B", "C"]);
        assert_eq!(reorder(&images, 1, 0), images);
        assert_eq!(reorder(&images, 1, 4), images);
    }

    #[test]
    fn move_up_swaps_with_predecessor() {
        let images = gallery(&["A", "B", "C"]);
        let updated = move_up(&images, 1);
        assert_eq!(titles(&updated), ["B", "A", "C"]);
        assert!(priorities_consistent(&updated));
    }

    #[test]
    fn move_up_on_first_record_is_a_noop() {
        let images = gallery(&["A", "B"]);
        assert_eq!(move_up(&images, 0), images);
    }

    #[test]
    fn move_down_on_last_record_is_a_noop() {
        let images = gallery(&["A", "B", "C"]);
        assert_eq!(move_down(&images, 2), images);
    }

    #[test]
    fn move_down_swaps_with_successor() {
        let images = gallery(&["A", "B", "C"]);
        let updated = move_down(&images, 0);
        assert_eq!(titles(&updated), ["B", "A", "C"]);
        assert!(priorities_consistent(&updated));
    }

    #[test]
    fn remove_renumbers_remaining_records() {
        let images = gallery(&["A", "B", "C"]);
        let updated = remove(&images, 0);
        assert_eq!(titles(&updated), ["B", "C"]);
        assert_eq!(
            updated.iter().map(|i| i.priority).collect::<Vec<_>>(),
            [1, 2]
        );
    }

    #[test]
    fn remove_last_record_yields_empty_gallery() {
        let images = gallery(&["A"]);
        assert_eq!(remove(&images, 0), []);
    }

    #[test]
    fn edit_field_changes_only_the_named_field() {
        let images = gallery(&["A", "B"]);
        let updated = edit_field(&images, 1, ImageField::Description("dusk".to_owned()));
        assert_eq!(updated[1].description, "dusk");
        assert_eq!(updated[1].title, "B");
        assert_eq!(
            updated.iter().map(|i| i.priority).collect::<Vec<_>>(),
            [1, 2]
        );
    }

    #[test]
    fn edit_field_with_unchanged_value_emits_identical_sequence() {
        let images = gallery(&["A", "B"]);
        let updated = edit_field(&images, 0, ImageField::Title("A".to_owned()));
        assert_eq!(updated, images);
    }

    struct StubStore {
        delays_ms: Vec<(String, u64)>,
        calls: Mutex<Vec<String>>,
        fail_on: Option<String>,
    }

    impl StubStore {
        fn new() -> StubStore {
            StubStore {
                delays_ms: Vec::new(),
                calls: Mutex::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    #[async_trait]
    impl ImageStore for StubStore {
        async fn store(&self, file: &UploadFile) -> Result<String, UploadError> {
            if let Some((_, ms)) = self
                .delays_ms
                .iter()
                .find(|(name, _)| *name == file.file_name)
            {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.calls.lock().await.push(file.file_name.clone());
            if self.fail_on.as_deref() == Some(file.file_name.as_str()) {
                return Err(UploadError::Service { status: 500 });
            }
            Ok(format!("https://images.test/{}", file.file_name))
        }
    }

    fn upload(name: &str, content_type: &str) -> UploadFile {
        UploadFile {
            file_name: name.to_owned(),
            content_type: content_type.to_owned(),
            bytes: vec![0u8; 4],
        }
    }

    #[tokio::test]
    async fn upload_appends_with_next_priority() {
        let store = StubStore::new();
        let images = gallery(&["A"]);
        let updated = assert_ok!(upload_and_append(&store, &images, &upload("b.png", "image/png")).await);
        assert_eq!(titles(&updated), ["A", "b.png"]);
        assert_eq!(updated[1].url, "https://images.test/b.png");
        assert_eq!(updated[1].description, "");
        assert!(priorities_consistent(&updated));
    }

    #[tokio::test]
    async fn non_image_upload_is_rejected_before_any_service_call() {
        let store = StubStore::new();
        let images = gallery(&["A"]);
        let err = upload_and_append(&store, &images, &upload("notes.txt", "text/plain"))
            .await
            .unwrap_err();
        assert_matches!(err, UploadError::NotAnImage { .. });
        assert_eq!(store.calls.lock().await.len(), 0);
    }

    #[tokio::test]
    async fn multi_file_uploads_settle_in_input_order() {
        // the first file is much slower than the second; priorities must
        // still follow input order because uploads are serialized
        let store = StubStore {
            delays_ms: vec![("f1.png".to_owned(), 40), ("f2.png".to_owned(), 0)],
            calls: Mutex::new(Vec::new()),
            fail_on: None,
        };
        let files = [upload("f1.png", "image/png"), upload("f2.png", "image/png")];
        let (updated, errors) = upload_and_append_all(&store, &[], &files).await;
        assert!(errors.is_empty());
        assert_eq!(titles(&updated), ["f1.png", "f2.png"]);
        assert_eq!(
            updated.iter().map(|i| i.priority).collect::<Vec<_>>(),
            [1, 2]
        );
        assert_eq!(*store.calls.lock().await, ["f1.png", "f2.png"]);
    }

    #[tokio::test]
    async fn failed_upload_is_skipped_and_the_rest_still_append() {
        let store = StubStore {
            delays_ms: Vec::new(),
            calls: Mutex::new(Vec::new()),
            fail_on: Some("f2.png".to_owned()),
        };
        let files = [
            upload("f1.png", "image/png"),
            upload("f2.png", "image/png"),
            upload("f3.png", "image/png"),
        ];
        let (updated, errors) = upload_and_append_all(&store, &[], &files).await;
        assert_eq!(errors.len(), 1);
        assert_matches!(&errors[0], UploadError::Service { status: 500 });
        // f3 takes the slot f2 would have had
        assert_eq!(titles(&updated), ["f1.png", "f3.png"]);
        assert!(priorities_consistent(&updated));
        assert_eq!(*store.calls.lock().await, ["f1.png", "f2.png", "f3.png"]);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Append(String),
        Remove(usize),
        Reorder(usize, i64),
        MoveUp(usize),
        MoveDown(usize),
        Edit(usize, bool, String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-z]{1,8}".prop_map(Op::Append),
            (0usize..16).prop_map(Op::Remove),
            ((0usize..16), (-2i64..20)).prop_map(|(i, p)| Op::Reorder(i, p)),
            (0usize..16).prop_map(Op::MoveUp),
            (0usize..16).prop_map(Op::MoveDown),
            ((0usize..16), any::<bool>(), "[a-z]{0,8}")
                .prop_map(|(i, t, v)| Op::Edit(i, t, v)),
        ]
    }

    fn append(images: &[ImageRecord], title: String) -> Vec<ImageRecord> {
        let mut updated = images.to_vec();
        updated.push(ImageRecord {
            url: format!("https://images.test/{}", title),
            title,
            description: String::new(),
            priority: images.len() as i64 + 1,
        });
        updated
    }

    proptest! {
        #[test]
        fn priorities_stay_contiguous_under_any_operation_sequence(
            ops in proptest::collection::vec(op_strategy(), 0..40)
        ) {
            let mut images: Vec<ImageRecord> = Vec::new();
            for op in ops {
                let before: Vec<String> =
                    images.iter().map(|i| i.title.clone()).collect();
                images = match op {
                    Op::Append(title) => append(&images, title),
                    Op::Remove(index) => remove(&images, index),
                    Op::Reorder(index, priority) => {
                        let updated = reorder(&images, index, priority);
                        let mut reordered: Vec<String> =
                            updated.iter().map(|i| i.title.clone()).collect();
                        let mut original = before.clone();
                        reordered.sort();
                        original.sort();
                        // a move never adds or drops records
                        prop_assert_eq!(reordered, original);
                        updated
                    }
                    Op::MoveUp(index) => move_up(&images, index),
                    Op::MoveDown(index) => move_down(&images, index),
                    Op::Edit(index, true, value) => {
                        edit_field(&images, index, ImageField::Title(value))
                    }
                    Op::Edit(index, false, value) => {
                        edit_field(&images, index, ImageField::Description(value))
                    }
                };
                prop_assert!(priorities_consistent(&images));
            }
        }
    }
}
