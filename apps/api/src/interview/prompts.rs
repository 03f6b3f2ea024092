// Interview simulator prompt templates.

pub const QUESTIONS_SYSTEM: &str = "\
You are an expert interviewer who creates comprehensive, balanced interview question sets.";

pub const QUESTIONS_PROMPT: &str = r#"Generate 5 diverse interview questions for this job opportunity:

Job Description: {job_description}

Candidate Background:
{candidate}

Create a balanced set of questions:
1. One behavioral question (past experience/situations)
2. One technical question (role-specific skills)
3. One problem-solving question (hypothetical scenario)
4. One cultural fit question (values/work style)
5. One career goals question (future aspirations)

Return a JSON array with this format:
[
  {
    "question": "Tell me about a time when...",
    "type": "behavioral",
    "difficulty": "medium",
    "focus_area": "teamwork"
  }
]

Make questions specific to the role and appropriate for the candidate's level."#;

pub const EVALUATION_SYSTEM: &str = "\
You are an expert interview coach providing constructive feedback to help candidates improve.";

pub const EVALUATION_PROMPT: &str = r#"Evaluate this interview answer.

Question: {question}
Answer: {answer}

Candidate Background:
- Role: {title}
- Skills: {skills}

Provide a score from 1 to 10, two or three strengths, two or three areas for
improvement and specific advice for a better answer.

Return JSON:
{
  "score": 8,
  "strengths": ["strength1", "strength2"],
  "improvements": ["improvement1", "improvement2"],
  "suggestions": "Specific advice for improvement"
}

Be constructive and helpful."#;

pub const COACHING_SYSTEM: &str = "\
You are a senior interview coach providing comprehensive performance feedback.";

pub const COACHING_PROMPT: &str = r#"Provide comprehensive interview feedback based on this session.

Interview Q&A:
{transcript}

Analyze the overall performance and provide:
1. Overall assessment (strengths and weaknesses)
2. Communication style feedback
3. Technical competency evaluation
4. Top 3 areas for improvement
5. Specific action steps for better interviews
6. Recommended practice areas
7. Overall readiness level

Be encouraging but honest, focusing on actionable improvements."#;

pub const TIPS_SYSTEM: &str = "\
You are an expert interview coach who provides specific, actionable answer strategies.";

pub const TIPS_PROMPT: &str = r#"Provide expert tips for answering this interview question:

Question: {question}

Candidate Profile:
{candidate}

Provide:
1. Key points to cover in the answer
2. Specific examples they could use based on their background
3. Common mistakes to avoid
4. Structure for the response (e.g., the STAR method)
5. How to tie back to their skills and experience

Make it actionable and specific to their profile."#;

pub const ROLE_QUESTIONS_SYSTEM: &str = "\
You are an expert interviewer who creates role-specific, company-tailored questions.";

pub const ROLE_QUESTIONS_PROMPT: &str = r#"Generate 5 role-specific interview questions for this opportunity:

Job Description: {job_description}
Company: {company}

Candidate Background:
{candidate}

Create questions that:
1. Are specific to this role and company
2. Test relevant technical and functional skills
3. Assess cultural fit for the company
4. Evaluate problem-solving abilities
5. Are appropriate for the experience level

Return a JSON array:
[
  {"question": "...", "type": "technical", "difficulty": "medium", "focus_area": "skills"}
]"#;
