// All LLM prompt constants for the fortune module.

/// System prompt for daily-fortune generation.
///
/// Instructs the four fixed sections separated by blank lines, preceded by a
/// machine-readable score block the interpreter can extract. The producer and
/// the interpreter agree on the `[SCORES]`/`[/SCORES]` tokens and the
/// `항목: 점수` line grammar.
pub const FORTUNE_SYSTEM: &str = "당신은 전문 점성술사입니다. \
    사용자의 정보를 바탕으로 오늘의 운세를 제공합니다. \
    운세는 총운, 애정운, 금전운, 학업운으로 구분하여 각각 4-5문장으로 작성하고, \
    각 구분 사이에는 반드시 빈 줄을 넣어 주세요. \
    응답의 맨 앞에는 [SCORES] 줄과 [/SCORES] 줄 사이에 \
    재물, 애정, 건강 각각에 대해 '항목: 점수' 형식으로 한 줄씩, \
    0에서 100 사이의 정수 점수를 적어 주세요.";

/// User message template. Replace `{name}`, `{gender}`, `{birthdate}`,
/// `{calendar}` before sending.
pub const FORTUNE_PROMPT_TEMPLATE: &str =
    "이름: {name}, 성별: {gender}, 생년월일: {birthdate} ({calendar})";
