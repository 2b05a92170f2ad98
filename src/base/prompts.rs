//! Prompt templates for LLM usage.

use std::path::Path;

use tracing::{error, info, instrument};

/// Built-in extraction prompt, used when the prompt file cannot be read.
pub const DEFAULT_EXTRACTION_PROMPT: &str = r#####"あなたは専門的なリサーチアシスタントで、整理された議論のデータセットを作成するお手伝いをする役割です。
一般市民から寄せられた意見を提示しますので、それらをより簡潔で読みやすい形に整理するお手伝いをお願いします。必要な場合は2つの別個の議論に分割することもできますが、多くの場合は1つの議論にまとめる方が望ましいでしょう。
結果は整形されたJSON形式の文字列リストとして返してください。
要約は必ず日本語で作成してください。"#####;

/// Load the extraction prompt from `path`, falling back to [`DEFAULT_EXTRACTION_PROMPT`].
///
/// Any failure (missing file, I/O error, invalid UTF-8) is logged and swallowed.
/// The result is trimmed of surrounding whitespace.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn load_prompt(path: impl AsRef<Path>) -> String {
    match std::fs::read_to_string(path.as_ref()) {
        Ok(prompt) => {
            info!("Loaded extraction prompt ({} bytes).", prompt.len());
            prompt.trim().to_string()
        }
        Err(err) => {
            error!("Error loading prompt: {err}");
            DEFAULT_EXTRACTION_PROMPT.trim().to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_load_prompt_reads_and_trims_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "\n  Summarize the comment as a JSON list.  \n").unwrap();

        let prompt = load_prompt(file.path());

        assert_eq!(prompt, "Summarize the comment as a JSON list.");
    }

    #[test]
    fn test_load_prompt_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();

        let prompt = load_prompt(dir.path().join("does-not-exist.txt"));

        assert_eq!(prompt, DEFAULT_EXTRACTION_PROMPT);
        assert!(prompt.starts_with("あなたは専門的なリサーチアシスタント"));
        assert!(prompt.ends_with("要約は必ず日本語で作成してください。"));
    }

    #[test]
    fn test_load_prompt_invalid_utf8_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0xff, 0xfe, 0xfd]).unwrap();

        let prompt = load_prompt(file.path());

        assert_eq!(prompt, DEFAULT_EXTRACTION_PROMPT);
    }
}
