/// Paragraph-accumulating text splitter with a character budget and tail
/// overlap between adjacent chunks. Stands in for an external splitter; the
/// pipeline only relies on the output being an ordered sequence of spans.
pub struct TextChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextChunker {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self {
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn split(&self, text: &str) -> Vec<String> {
        let mut chunks = Vec::new();
        let mut current = String::new();

        for paragraph in text.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            if paragraph.chars().count() > self.chunk_size {
                if !current.is_empty() {
                    chunks.push(std::mem::take(&mut current));
                }
                chunks.extend(self.split_oversized(paragraph));
                continue;
            }

            let would_overflow = !current.is_empty()
                && current.chars().count() + paragraph.chars().count() + 2 > self.chunk_size;
            if would_overflow {
                let tail = self.overlap_tail(&current);
                chunks.push(std::mem::take(&mut current));
                current = tail;
            }

            if !current.is_empty() {
                current.push_str("\n\n");
            }
            current.push_str(paragraph);
        }

        if !current.is_empty() {
            chunks.push(current);
        }
        chunks
    }

    /// Last `chunk_overlap` characters of a finished chunk, carried into
    /// the next one.
    fn overlap_tail(&self, chunk: &str) -> String {
        if self.chunk_overlap == 0 {
            return String::new();
        }
        let chars: Vec<char> = chunk.chars().collect();
        let start = chars.len().saturating_sub(self.chunk_overlap);
        chars[start..].iter().collect()
    }

    /// Cut a paragraph longer than the budget on a sliding character
    /// window.
    fn split_oversized(&self, paragraph: &str) -> Vec<String> {
        let chars: Vec<char> = paragraph.chars().collect();
        let step = self.chunk_size.saturating_sub(self.chunk_overlap).max(1);
        let mut pieces = Vec::new();
        let mut start = 0;

        while start < chars.len() {
            let end = (start + self.chunk_size).min(chars.len());
            pieces.push(chars[start..end].iter().collect());
            if end == chars.len() {
                break;
            }
            start += step;
        }
        pieces
    }
}
