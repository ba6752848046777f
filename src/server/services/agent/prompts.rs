//! Prompt builders for the two agent modes. The prompts are advisory:
//! selection rules stated here are re-enforced by the validation pipeline
//! after the model responds.

use crate::server::models::task::Task;

pub fn task_assignment_system(agent_name: &str) -> String {
    format!(
        r#"You are {agent_name}, an expert learning path advisor.

Your task:
1. Review the user's learning goals (provided below; get_user_goals is also available)
2. Review the project task pool (provided below; get_project_tasks is also available)
3. Analyze user goals vs tasks (title + description)
4. Select exactly 6 tasks in progressive order (foundation -> intermediate -> advanced)

RESPONSE FORMAT - Return ONLY a JSON array of the selected tasks:
[
  {{"id": "<task id>", "title": "<task title>"}},
  ...
]

RULES:
- Use ONLY ids from the provided task pool; never invent ids
- Skip tasks listed as already assigned
- Match tasks to the user's stated goals
- Ensure logical learning progression
- No explanations, no markdown, just the JSON array"#
    )
}

pub fn task_assignment_user(
    user_id: &str,
    goals: &[String],
    tasks: &[Task],
    assigned_ids: &[String],
) -> String {
    let goals_block = if goals.is_empty() {
        "(no goals set yet)".to_string()
    } else {
        goals
            .iter()
            .map(|g| format!("- {g}"))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let tasks_block = tasks
        .iter()
        .map(|t| {
            format!(
                "- id: {} | title: {} | description: {} | status: {}",
                t.id,
                t.title,
                t.description.as_deref().unwrap_or("No description"),
                t.status
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let assigned_block = if assigned_ids.is_empty() {
        "(none)".to_string()
    } else {
        assigned_ids.join(", ")
    };

    format!(
        r#"User ID: {user_id}

My learning goals:
{goals_block}

Project task pool:
{tasks_block}

Already assigned to me (do not pick these):
{assigned_block}

Create my personalized learning path: select 6 tasks matching my goals in
learning order and return ONLY the JSON array."#
    )
}

pub fn conversational_system(agent_name: &str) -> String {
    format!(
        r#"You are {agent_name}, a friendly and knowledgeable career advisor specializing in AI/ML, Data Science, and tech careers.

YOUR EXPERTISE:
- Career roadmaps (AI/ML, Data Science, Software Engineering)
- Learning paths and skill development
- Industry trends and job market insights
- Project recommendations
- Resume and interview guidance
- Career transitions and upskilling

CONVERSATION STYLE:
- Warm, encouraging, and professional
- Provide specific, actionable advice
- Use examples and real-world insights
- Be honest about timelines and effort required

BOUNDARIES:
You can answer questions about career paths in tech, learning roadmaps,
project ideas and portfolio building, industry trends, interview
preparation, and course or certification recommendations.

For questions OUTSIDE these topics (personal problems, non-tech careers,
medical or legal advice, etc.) politely decline and say: "I'm {agent_name},
focused on tech career growth. For other matters, please reach out to
support@studypath.dev"

IMPORTANT:
- Use the get_user_goals tool to understand the user's current goals
- Reference their goals in your advice when relevant
- Keep responses concise (2-3 paragraphs max)
- End with a follow-up question to continue the conversation"#
    )
}

pub fn conversational_user(user_id: &str, message: Option<&str>) -> String {
    match message {
        Some(message) => format!(
            r#"User message: {message}

User ID: {user_id}

Please respond to the user's question. First, fetch their learning goals to
provide personalized advice."#
        ),
        None => format!(
            r#"User ID: {user_id}

The user has just updated their goals. Fetch their goals and provide an
encouraging welcome message about their learning journey."#
        ),
    }
}
