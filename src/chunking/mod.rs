//! Fixed-size overlapping window chunking.
//!
//! Documents are split into character windows of `chunk_size` with exactly
//! `overlap` characters repeated between consecutive windows. The splitter is
//! deliberately blind to sentence and paragraph boundaries; windows are a
//! pure function of the input text and the `(chunk_size, overlap)` pair, so
//! re-chunking an unchanged document always yields the same windows.
//!
//! Offsets are *character* offsets. Corpus files are decoded best-effort, so
//! slicing by raw byte positions could land inside a multi-byte sequence;
//! windows are therefore mapped back to byte ranges through the text's char
//! boundaries.

use crate::types::RagError;

/// Splits `text` into overlapping windows of at most `chunk_size` characters.
///
/// Consecutive windows share exactly `overlap` characters; the final window
/// may be shorter than `chunk_size`. Empty input yields no chunks.
///
/// A configuration with `chunk_size == 0` or `overlap >= chunk_size` cannot
/// make forward progress and is rejected with [`RagError::InvalidInput`].
///
/// ```
/// use ragloom::chunking::chunk_text;
///
/// let chunks = chunk_text("A B C D E", 3, 1).unwrap();
/// assert_eq!(chunks, vec!["A B", "B C", "C D", "D E"]);
/// ```
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Result<Vec<String>, RagError> {
    if chunk_size == 0 {
        return Err(RagError::InvalidInput(
            "chunk_size must be positive".to_string(),
        ));
    }
    if overlap >= chunk_size {
        return Err(RagError::InvalidInput(format!(
            "overlap ({overlap}) must be smaller than chunk_size ({chunk_size})"
        )));
    }

    // Byte offset of every char boundary, with the end-of-text sentinel.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let total_chars = boundaries.len() - 1;
    if total_chars == 0 {
        return Ok(Vec::new());
    }

    let step = chunk_size - overlap;
    let mut chunks = Vec::new();
    let mut start = 0usize;
    loop {
        let end = usize::min(start + chunk_size, total_chars);
        chunks.push(text[boundaries[start]..boundaries[end]].to_string());
        if end == total_chars {
            break;
        }
        start += step;
    }
    Ok(chunks)
}
