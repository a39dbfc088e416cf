use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct StartQuizRequest {
    #[validate(length(min = 1, max = 100))]
    pub lesson_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 100))]
    pub question_id: String,

    #[validate(length(min = 1, max = 100))]
    pub option_id: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HistoryParams {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<i64>,
}

impl HistoryParams {
    pub fn limit_or(&self, default_limit: i64) -> i64 {
        self.limit.unwrap_or(default_limit).clamp(1, 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_lesson_id_fails_validation() {
        let request = StartQuizRequest {
            lesson_id: String::new(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn submit_answer_requires_both_ids() {
        let request = SubmitAnswerRequest {
            question_id: "q-1".to_string(),
            option_id: String::new(),
        };
        assert!(request.validate().is_err());

        let request = SubmitAnswerRequest {
            question_id: "q-1".to_string(),
            option_id: "o-1".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn history_limit_falls_back_to_default() {
        let params = HistoryParams { limit: None };
        assert_eq!(params.limit_or(10), 10);

        let params = HistoryParams { limit: Some(500) };
        assert!(params.validate().is_err());
        assert_eq!(params.limit_or(10), 100);
    }
}
