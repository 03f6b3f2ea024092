// Career planning prompt templates.

pub const STRATEGY_SYSTEM: &str = "\
You are a senior career strategist who creates comprehensive, actionable career plans.";

pub const STRATEGY_PROMPT: &str = r#"Create a comprehensive career strategy for:

{candidate}

Career Goals: {goals}
Timeline: {horizon}

Include:
1. Step-by-step career roadmap
2. Skills development plan
3. Networking strategy
4. Target companies and roles
5. Salary progression expectations
6. Key milestones and timelines
7. Risk mitigation strategies
8. Alternative pathways

Make it specific, actionable and realistic for the timeline."#;

pub const POTENTIAL_SYSTEM: &str = "\
You are a career market analyst who evaluates professional potential and trends.";

pub const POTENTIAL_PROMPT: &str = r#"Analyze the career potential of:

{candidate}

Score from 0 to 100: market demand for the role, salary growth potential and
skill relevance to future trends. Name key growth areas and the market trends
affecting the field.

Return JSON:
{
  "market_demand": number,
  "salary_growth": number,
  "skill_relevance": number,
  "growth_areas": ["area1", "area2", "area3"],
  "market_trends": ["trend1", "trend2"]
}"#;

pub const LEARNING_SYSTEM: &str = "\
You are a learning strategist who creates targeted skill development plans.";

pub const LEARNING_PROMPT: &str = r#"Create a personalized learning path for:

{candidate}

Recommend:
1. Priority skills to develop
2. Specific courses and certifications
3. A learning timeline (3-6 months)
4. Free and paid resources
5. Hands-on projects to practice
6. How the skills align with their career goals

Focus on high-impact, career-advancing skills."#;
