// Profile parsing prompt templates.

pub const PROFILE_PARSE_SYSTEM: &str = "\
You are an expert resume parser. Extract information accurately and return only valid JSON.";

pub const PROFILE_PARSE_PROMPT: &str = r#"Parse the following resume text and extract key information into a structured format.
Focus on accuracy and completeness.

RESUME TEXT:
{resume_text}

Extract and return the following information as JSON:
{
  "name": "Full name of the person",
  "email": "Email address",
  "phone": "Phone number",
  "title": "Current or most recent job title/position",
  "location": "Current location",
  "summary": "One or two sentence professional summary",
  "skills": ["technical and soft skills"],
  "experience": "Brief summary of work experience",
  "education": "Educational background",
  "projects": ["notable projects"],
  "certifications": ["certifications"]
}

If information is not found, use an empty string or an empty array."#;
