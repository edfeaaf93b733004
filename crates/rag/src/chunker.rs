//! Fixed-window text chunking with a leading overlap.

/// Split text into chunks for embedding.
///
/// Windows are measured in characters, not bytes. The first chunk covers
/// `[0, chunk_size)`. Every later chunk takes the nominal window
/// `[i * chunk_size, (i + 1) * chunk_size)` shifted left by `overlap`, so
/// the second chunk re-reads the tail of the first and all later chunks
/// tile contiguously. Window ends are capped at the text length; the last
/// window may stop short of it, dropping up to `overlap` trailing
/// characters.
///
/// Produces exactly `ceil(len / chunk_size)` chunks. Callers guarantee
/// `chunk_size > 0` and `overlap < chunk_size` (enforced by
/// `AppConfig::validate`).
pub fn split_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut chunks = Vec::new();

    let mut start = 0;
    while start < chars.len() {
        let (lo, hi) = if start == 0 {
            (0, chunk_size.min(chars.len()))
        } else {
            (
                start - overlap,
                (start + chunk_size - overlap).min(chars.len()),
            )
        };

        chunks.push(chars[lo..hi].iter().collect());
        start += chunk_size;
    }

    tracing::debug!(
        "Split {} chars into {} chunks (size: {}, overlap: {})",
        chars.len(),
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}
