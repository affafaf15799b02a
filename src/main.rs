use std::io::{self, Write};

use techquiz_client::app_state::AppState;
use techquiz_client::config::Config;
use techquiz_client::errors::AppError;
use techquiz_client::models::domain::Technology;
use techquiz_client::models::dto::request::RegisterRequest;
use techquiz_client::services::{EnginePhase, ExitOutcome, SubmitOutcome};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let mut state = match AppState::new(config) {
        Ok(state) => state,
        Err(err) => {
            eprintln!("failed to start: {}", err);
            std::process::exit(1);
        }
    };

    println!("TechQuiz ({})", state.config.api_base_url);
    state.auth.bootstrap().await;
    if let Some(identity) = state.auth.identity().await {
        println!("Welcome back, {}!", identity.username);
    }

    loop {
        let authenticated = state.auth.is_authenticated().await;
        println!();
        println!("[t] take a quiz  [l] login  [r] register{}  [q] quit",
            if authenticated { "  [d] dashboard  [o] logout" } else { "" });

        match read_line("> ").as_str() {
            "t" => run_quiz_flow(&mut state).await,
            "l" => login_flow(&state).await,
            "r" => register_flow(&state).await,
            "d" if authenticated => dashboard_flow(&state).await,
            "o" if authenticated => {
                state.auth.logout().await;
                println!("Logged out.");
            }
            "q" => {
                state.auth.dispose().await;
                break;
            }
            other => println!("Unknown choice: {}", other),
        }
    }
}

async fn login_flow(state: &AppState) {
    let username = read_line("username: ");
    let password = read_line("password: ");

    match state.auth.login(&username, &password).await {
        Ok(identity) => println!("Logged in as {}.", identity.username),
        Err(err) => println!("Login failed: {}", err),
    }
}

async fn register_flow(state: &AppState) {
    let data = RegisterRequest {
        username: read_line("username: "),
        password: read_line("password: "),
        email: read_line("email: "),
        full_name: read_line("full name: "),
    };

    match state.auth.register(&data).await {
        Ok(identity) => println!("Registered and logged in as {}.", identity.username),
        Err(err) => println!("Registration failed: {}", err),
    }
}

async fn dashboard_flow(state: &AppState) {
    let Some(credential) = state.auth.credential().await else {
        println!("Not logged in.");
        return;
    };

    match state.api.fetch_dashboard(&credential).await {
        Ok(dashboard) => {
            let stats = &dashboard.statistics;
            println!();
            println!("Quizzes taken: {}", stats.total_quizzes);
            println!("Average score: {:.1}%", stats.average_score);
            println!("Best score:    {:.1}%", stats.best_score);
            println!(
                "Time spent:    {}m {}s",
                stats.total_time_spent / 60,
                stats.total_time_spent % 60
            );
            if !dashboard.quiz_history.is_empty() {
                println!();
                println!("History:");
                for session in &dashboard.quiz_history {
                    println!(
                        "  {}  {:>5.1}%  {}/{}  {}",
                        session.started_at.format("%Y-%m-%d %H:%M"),
                        session.score_percentage,
                        session.correct_answers,
                        session.total_questions,
                        session.technology_name,
                    );
                }
            }
        }
        Err(err) => println!("Dashboard unavailable: {}", err),
    }
}

async fn run_quiz_flow(state: &mut AppState) {
    let technologies = match state.api.fetch_technologies().await {
        Ok(technologies) => technologies,
        Err(err) => {
            println!("Could not load technologies: {}", err);
            return;
        }
    };
    if technologies.is_empty() {
        println!("No technologies available.");
        return;
    }

    println!();
    for (i, tech) in technologies.iter().enumerate() {
        println!("  {}. {}", i + 1, tech.label());
    }
    let choice = read_line("technology (number, or b to go back): ");
    if choice == "b" {
        return;
    }
    let Some(technology) = parse_choice(&choice, &technologies) else {
        println!("Unknown choice: {}", choice);
        return;
    };
    let technology = technology.name.clone();

    if let Err(err) = state.engine.select_technology(&technology).await {
        show_error(&err);
        return;
    }

    loop {
        match state.engine.phase() {
            EnginePhase::InProgress => {
                if !answer_current_question(state).await {
                    return;
                }
            }
            EnginePhase::Completed => {
                show_results(state);
                match read_line("[r] restart  [b] back: ").as_str() {
                    "r" => {
                        if let Err(err) = state.engine.restart().await {
                            show_error(&err);
                            return;
                        }
                    }
                    _ => {
                        state.engine.request_exit();
                        return;
                    }
                }
            }
            _ => return,
        }
    }
}

/// Renders the current question and submits the chosen option. Returns false
/// when the user left the quiz.
async fn answer_current_question(state: &mut AppState) -> bool {
    let Some(question) = state.engine.current_question() else {
        return false;
    };
    let attempt = match state.engine.attempt() {
        Some(attempt) => attempt,
        None => return false,
    };

    println!();
    println!(
        "Question {} of {}  [{} | {} | difficulty {}/5]",
        attempt.current_index + 1,
        attempt.questions.len(),
        question.technology,
        question.category,
        question.difficulty,
    );
    println!("{}", question.question_text);
    let options = question.options.clone();
    for (i, option) in options.iter().enumerate() {
        println!("  {}. {}", i + 1, option);
    }

    loop {
        let choice = read_line("answer (number, or b to go back): ");
        if choice == "b" || choice == "q" {
            match state.engine.request_exit() {
                ExitOutcome::Exited => return false,
                ExitOutcome::ConfirmationRequired => {
                    let confirm = read_line("Abandon this quiz? Progress will be lost. [y/N]: ");
                    if confirm.eq_ignore_ascii_case("y") {
                        state.engine.confirm_exit();
                        return false;
                    }
                    continue;
                }
            }
        }

        let Some(selected) = choice
            .parse::<usize>()
            .ok()
            .and_then(|n| options.get(n.checked_sub(1)?))
        else {
            println!("Unknown choice: {}", choice);
            continue;
        };

        match state.engine.submit_answer(selected).await {
            Ok(SubmitOutcome::NextQuestion) | Ok(SubmitOutcome::Completed) => return true,
            Err(err) => {
                show_error(&err);
                return false;
            }
        }
    }
}

fn show_results(state: &AppState) {
    let Some(results) = state.engine.final_results() else {
        return;
    };

    println!();
    println!("Quiz complete!");
    println!(
        "Score: {} of {} ({:.1}%)",
        results.correct_answers, results.total_questions, results.score_percentage
    );
    println!(
        "Time:  {}m {}s",
        results.time_spent_seconds / 60,
        results.time_spent_seconds % 60
    );
    if !results.is_saved() {
        println!("(local result, not saved to your history)");
    }
}

/// User-visible errors are printed as-is; everything else is a degraded path
/// the engine already absorbed, so only a generic notice is shown.
fn show_error(err: &AppError) {
    if err.is_user_visible() {
        println!("{}", err);
    } else if !err.is_cancelled() {
        println!("Something went wrong, please try again.");
    }
}

fn parse_choice<'a>(choice: &str, technologies: &'a [Technology]) -> Option<&'a Technology> {
    choice
        .parse::<usize>()
        .ok()
        .and_then(|n| technologies.get(n.checked_sub(1)?))
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    let _ = io::stdout().flush();

    let mut line = String::new();
    match io::stdin().read_line(&mut line) {
        Ok(0) | Err(_) => "q".to_string(),
        Ok(_) => line.trim().to_string(),
    }
}
