// Document generation prompt templates.
// Placeholders in braces are filled by `fill_template` in the callers.

pub const RESUME_SYSTEM: &str = "\
You are an expert resume writer who creates compelling, ATS-optimized resumes \
with quantified achievements.";

pub const RESUME_PROMPT: &str = r#"Create an enhanced, {style} resume for:

{candidate}
Email: {email}
Phone: {phone}

Apply these enhancements: {enhancements}
{tailoring}
Create a professional resume with:
1. A compelling professional summary (3-4 lines)
2. Core competencies and technical skills
3. Professional experience with bullet points and quantified achievements
4. Education
5. Strong action verbs and industry keywords for ATS systems

Format in clean plain text for both ATS and human review.
{no_commentary}"#;

pub const RESUME_TAILORING: &str = "\nTailor the resume for this job:\n{job_description}\n";

pub const ATS_OPTIMIZE_SYSTEM: &str = "\
You are an ATS optimization expert who improves resume compatibility while maintaining quality.";

pub const ATS_OPTIMIZE_PROMPT: &str = r#"Optimize this resume for ATS systems and the target job.

CURRENT RESUME:
{resume}

TARGET JOB:
{job_description}

Enhance the resume by:
1. Adding relevant keywords from the job description
2. Improving formatting for ATS readability
3. Quantifying achievements where possible
4. Using action verbs and industry terminology
5. Ensuring proper section headers
6. Maintaining readability for humans

{no_commentary}"#;

pub const QUALITY_SYSTEM: &str = "\
You are an expert resume evaluator who provides detailed quality analysis.";

pub const QUALITY_PROMPT: &str = r#"Evaluate this resume for quality and ATS compatibility.

RESUME:
{resume}

{target}

Score it from 0 to 100 considering ATS compatibility, keyword optimization,
content quality, format structure and achievement quantification.

Return JSON:
{
  "overall_score": number,
  "suggestions": ["improvement 1", "improvement 2"]
}"#;

pub const COVER_LETTER_SYSTEM: &str = "\
You are an expert career counselor who writes compelling, {tone} cover letters \
that get interviews.";

pub const COVER_LETTER_PROMPT: &str = r#"Write a compelling, {tone} cover letter body for:

{candidate}

Target Company: {company}
Position: {position}
Job Description: {job_description}

The letter must:
1. Open with a hook specific to the company
2. Demonstrate a clear understanding of the role
3. Highlight the most relevant experience and achievements with specific examples
4. Maintain a {tone} tone throughout
5. Close with a strong call to action
6. Be {word_range} words long

Write only the body paragraphs: no address block, date, greeting or signature.
{no_commentary}"#;

pub const PORTFOLIO_SYSTEM: &str = "\
You are an expert portfolio designer who creates compelling, professional content.";

pub const PORTFOLIO_PROMPT: &str = r#"Create professional portfolio content for:

{candidate}

Portfolio Style: {style}
Color Scheme: {color_scheme}

Generate:
1. A compelling professional headline
2. An engaging about section (200-250 words)
3. Skills grouped into named categories
4. {projects_instruction}
5. Professional achievements
6. A call-to-action statement

Return JSON:
{
  "headline": "string",
  "about": "string",
  "skills_categories": {"Category": ["skill"]},
  "projects": [{"name": "string", "description": "string", "tech": ["string"]}],
  "achievements": ["string"],
  "cta": "string"
}"#;

pub const RESUME_MATCH_SYSTEM: &str = "\
You are an expert at analyzing resume-job fit and ATS optimization.";

pub const RESUME_MATCH_PROMPT: &str = r#"Analyze the match between this resume and job description.

RESUME:
{resume}

JOB DESCRIPTION:
{job_description}

Provide:
1. Match percentage (0-100)
2. Number of matching keywords
3. ATS compatibility score (0-100)
4. Specific improvement suggestions
5. Missing keywords to add

Return JSON:
{
  "match_percentage": number,
  "keyword_matches": number,
  "ats_score": number,
  "suggestions": ["suggestion1", "suggestion2"],
  "missing_keywords": ["keyword1", "keyword2"]
}"#;

pub const JOB_REQUIREMENTS_SYSTEM: &str = "\
You are an expert job analyst who evaluates candidate-job fit.";

pub const JOB_REQUIREMENTS_PROMPT: &str = r#"Analyze this job description against the candidate's profile.

JOB DESCRIPTION:
{job_description}

CANDIDATE:
{candidate}

Provide:
1. Keyword matches found
2. Skills alignment percentage
3. Missing requirements
4. Suggested improvements

Return JSON:
{
  "keyword_matches": number,
  "skills_alignment": number,
  "missing_requirements": ["requirement1"],
  "suggestions": ["suggestion1"]
}"#;

pub const COVER_LETTER_QUALITY_SYSTEM: &str = "\
You are an expert cover letter evaluator who provides detailed quality analysis.";

pub const COVER_LETTER_QUALITY_PROMPT: &str = r#"Analyze this cover letter for quality and effectiveness.

COVER LETTER:
{cover_letter}

TARGET JOB:
{job_description}

Score each from 0 to 100: overall quality and impact, personalization,
relevance to the job requirements, professional tone.

Return JSON:
{
  "overall_score": number,
  "personalization": number,
  "relevance": number,
  "tone_score": number,
  "strengths": ["strength1", "strength2"],
  "improvements": ["improvement1", "improvement2"],
  "suggestions": "Specific advice for enhancement"
}"#;
