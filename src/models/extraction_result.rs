use serde::{Deserialize, Serialize};

/// 单个文件的提取结果
///
/// `text` 与 `error` 恰好有一个有值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    pub file_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExtractionResult {
    pub fn success(file_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: Some(text.into()),
            error: None,
        }
    }

    pub fn failure(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            text: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.text.is_some()
    }
}

/// 一次批处理的结果，与提交的文件列表按下标对齐
pub type ResultSet = Vec<ExtractionResult>;

/// 批处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchStats {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

impl BatchStats {
    pub fn from_results(results: &[ExtractionResult]) -> Self {
        let success = results.iter().filter(|r| r.is_success()).count();
        Self {
            total: results.len(),
            success,
            failed: results.len() - success,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_omits_absent_fields() {
        let ok = serde_json::to_value(ExtractionResult::success("a.pdf", "X")).unwrap();
        assert_eq!(ok, serde_json::json!({ "fileName": "a.pdf", "text": "X" }));

        let failed = serde_json::to_value(ExtractionResult::failure("b.png", "boom")).unwrap();
        assert_eq!(failed, serde_json::json!({ "fileName": "b.png", "error": "boom" }));
    }

    #[test]
    fn test_batch_stats() {
        let results = vec![
            ExtractionResult::success("a", "1"),
            ExtractionResult::failure("b", "e"),
            ExtractionResult::success("c", "2"),
        ];
        let stats = BatchStats::from_results(&results);
        assert_eq!(stats, BatchStats { total: 3, success: 2, failed: 1 });
        assert_eq!(BatchStats::from_results(&[]), BatchStats::default());
    }
}
