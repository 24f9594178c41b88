// Prompt templates for every AI-assisted action.
// Placeholders are `{name}` and are filled with `str::replace` before sending.

use crate::llm_client::CompletionParams;

pub const COVER_LETTER_PARAMS: CompletionParams = CompletionParams::new(0.7, Some(500));
pub const QUIZ_PARAMS: CompletionParams = CompletionParams::new(0.3, None);
pub const IMPROVEMENT_TIP_PARAMS: CompletionParams = CompletionParams::new(0.7, Some(100));
pub const INSIGHTS_PARAMS: CompletionParams = CompletionParams::new(0.3, None);
pub const RESUME_IMPROVE_PARAMS: CompletionParams = CompletionParams::new(0.7, Some(200));

/// Replace: {job_title}, {company_name}, {job_description}
pub const COVER_LETTER_TEMPLATE: &str = r#"Write a professional cover letter for a {job_title} position at {company_name}.

Job Description:
{job_description}

Requirements:
1. Professional, enthusiastic tone
2. Highlight relevant skills and experience
3. Show understanding of the company's needs
4. At most 400 words
5. Standard business letter formatting
6. Concrete examples of achievements

Return only the letter."#;

pub const QUIZ_TEMPLATE: &str = r#"Generate 10 technical interview questions for a software professional.

Each question is multiple choice with exactly 4 options.

Return ONLY JSON in this shape:
{
  "questions": [
    {
      "question": "string",
      "options": ["string", "string", "string", "string"],
      "correctAnswer": "string",
      "explanation": "string"
    }
  ]
}

`correctAnswer` must be the exact text of one of the options."#;

/// Replace: {wrong_answers}
pub const IMPROVEMENT_TIP_TEMPLATE: &str = r#"A candidate answered these technical interview questions incorrectly:

{wrong_answers}

Give one concise, encouraging improvement tip focused on the knowledge gaps above.
Keep it under 2 sentences."#;

/// Replace: {industry}
pub const INSIGHTS_TEMPLATE: &str = r#"Analyze the current state of the {industry} industry and return ONLY JSON in this shape:
{
  "salaryRanges": [
    { "role": "string", "min": 0, "max": 0, "median": 0, "location": "string" }
  ],
  "growthRate": 0,
  "demandLevel": "High" | "Medium" | "Low",
  "topSkills": ["skill"],
  "marketOutlook": "Positive" | "Neutral" | "Negative",
  "keyTrends": ["trend"],
  "recommendedSkills": ["skill"]
}

Include at least 5 common roles in salaryRanges.
growthRate is a percentage.
Include at least 5 skills and 5 trends."#;

/// Replace: {kind}, {current}
pub const RESUME_IMPROVE_TEMPLATE: &str = r#"As an expert resume writer, improve the following {kind} description.
Make it more impactful, quantifiable, and aligned with industry standards.
Current content: "{current}"

Requirements:
1. Use action verbs
2. Include metrics and results where possible
3. Highlight relevant technical skills
4. Keep it concise but detailed
5. Focus on achievements over responsibilities
6. Use industry-specific keywords

Respond with a single paragraph and nothing else."#;

/// Substitutes `{name}` placeholders in one pass. Inserted values are never
/// scanned again, so user text containing a placeholder stays literal.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let matched = values.iter().find_map(|(name, value)| {
            let key_len = name.len() + 2;
            let is_key = tail.len() >= key_len
                && tail[1..].starts_with(name)
                && tail[1 + name.len()..].starts_with('}');
            is_key.then_some((key_len, *value))
        });
        match matched {
            Some((key_len, value)) => {
                out.push_str(value);
                rest = &tail[key_len..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
