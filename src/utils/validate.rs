/// 标题、题目、选项文本的最大长度（字符数）
pub const MAX_TEXT_LENGTH: usize = 255;

pub fn validate_quiz_title(title: &str) -> Result<(), &'static str> {
    if title.is_empty() {
        return Err("Title is required");
    }
    if title.chars().count() > MAX_TEXT_LENGTH {
        return Err("Title must be at most 255 characters");
    }
    Ok(())
}

pub fn validate_question_text(text: &str) -> Result<(), &'static str> {
    if text.is_empty() {
        return Err("Question text is required");
    }
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err("Question text must be at most 255 characters");
    }
    Ok(())
}

pub fn validate_choice_text(text: &str) -> Result<(), &'static str> {
    if text.chars().count() > MAX_TEXT_LENGTH {
        return Err("Choice text must be at most 255 characters");
    }
    Ok(())
}
