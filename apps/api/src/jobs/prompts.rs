// Job match analysis prompt templates.

pub const JOB_MATCH_SYSTEM: &str = "You are an expert job matcher who compares a candidate \
with a single job posting and estimates how well they fit.";

pub const JOB_MATCH_PROMPT: &str = r#"Analyze this job match for the candidate.

Job: {title} at {company}
Listed skills: {job_skills}
Description: {description}

Candidate:
{candidate}

Return ONLY a JSON object with this exact shape (percentages are integers 0-100):
{"skills_match": 0, "experience_match": 0, "overall_fit": 0, "explanation": "one sentence"}"#;

pub const COMPANY_INSIGHTS_SYSTEM: &str = "You are a company research analyst who summarizes \
employers for job seekers.";

pub const COMPANY_INSIGHTS_PROMPT: &str = r#"Give company insights for "{company}".

If this is a real company, provide accurate information. If you do not know it,
give your best realistic estimate and keep the fields generic.

Return ONLY a JSON object:
{
  "industry": "Primary industry",
  "size": "Startup/Small/Medium/Large/Enterprise",
  "founded_year": 2010,
  "location": "Primary location",
  "culture": ["value1", "value2", "value3"],
  "benefits": ["benefit1", "benefit2", "benefit3"],
  "tech_stack": ["tech1", "tech2", "tech3"],
  "growth_stage": "Growing/Mature/Scaling",
  "rating": 4.2,
  "notable_for": "What the company is known for"
}"#;

pub const ALERT_PREVIEW_SYSTEM: &str = "You are a job market analyst who provides realistic \
job alert previews.";

pub const ALERT_PREVIEW_PROMPT: &str = r#"Preview the results of a job alert for:

Alert Keywords: {keywords}
Location: {location}
User Profile: {title} with {skill_count} skills ({skills})

Describe:
1. Types of jobs this alert would find
2. Typical companies that would match
3. Expected salary ranges
4. Required qualifications
5. How often the alert is likely to trigger

Keep it realistic and helpful."#;
