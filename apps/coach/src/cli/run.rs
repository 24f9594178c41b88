use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context as _};
use serde::Serialize;
use tracing::info;

use crate::cli::commands::{
    CoverLetterCommands, InterviewCommands, QuizCommands, ResumeCommands,
};
use crate::cli::interactive;
use crate::cli::render;
use crate::cli::{Cli, Commands};
use crate::config::Config;
use crate::features::resume::ResumeUpload;
use crate::features::{auth, cover_letter, dashboard, interview, quiz, resume, user};
use crate::gateway::ApiClient;
use crate::llm_client::{Completion, LlmClient};
use crate::models::cover_letter::CoverLetterRequest;
use crate::models::user::{LoginRequest, ProfileUpdate, RegisterRequest};
use crate::quiz::QuizMode;
use crate::session::SessionStore;

/// Everything a command handler needs: config, persisted session and clients.
pub struct Context {
    pub config: Config,
    pub store: SessionStore,
    pub api: ApiClient,
    pub llm: Arc<dyn Completion>,
    pub json: bool,
}

impl Context {
    pub fn init(config: Config, json: bool) -> anyhow::Result<Self> {
        let store = SessionStore::open(config.session_file.clone())?;
        let api = ApiClient::from_config(&config)?
            .with_token(store.current().token().map(str::to_string));
        let llm: Arc<dyn Completion> = Arc::new(
            LlmClient::new(&config).context("failed to initialize the completion client")?,
        );
        Ok(Self {
            config,
            store,
            api,
            llm,
            json,
        })
    }

    /// The gateway client, provided a session token is stored.
    fn authed(&self) -> anyhow::Result<&ApiClient> {
        if !self.store.current().is_authenticated() {
            bail!("Not logged in. Run `coach login --email <email>` first.");
        }
        Ok(&self.api)
    }

    fn show<T: Serialize>(&self, value: &T, text: impl FnOnce(&T) -> String) {
        if self.json {
            println!("{}", render::json(value));
        } else {
            print!("{}", text(value));
        }
    }
}

/// Runs one command. The actions service needs no session or CLI context.
pub async fn dispatch(cli: Cli, config: Config) -> anyhow::Result<()> {
    match cli.command {
        Commands::Serve => crate::serve(config).await,
        command => {
            let mut ctx = Context::init(config, cli.json)?;
            run_command(&mut ctx, command).await
        }
    }
}

async fn run_command(ctx: &mut Context, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve => crate::serve(ctx.config.clone()).await?,
        Commands::Login(args) => {
            let request = LoginRequest {
                email: args.email,
                password: args.password,
            };
            let session = auth::login_and_store(&ctx.api, &mut ctx.store, &request).await?;
            if let Some(user) = session.user() {
                println!("Logged in as {} <{}>", user.name, user.email);
            }
        }
        Commands::Register(args) => {
            let request = RegisterRequest {
                name: args.name,
                email: args.email,
                password: args.password,
            };
            let session = auth::register_and_store(&ctx.api, &mut ctx.store, &request).await?;
            if let Some(user) = session.user() {
                println!("Welcome, {}! Next: `coach profile --industry <name>`", user.name);
            }
        }
        Commands::Logout => {
            ctx.store.clear()?;
            println!("Logged out.");
        }
        Commands::Whoami => match ctx.store.current().user() {
            Some(user) => ctx.show(user, render::user),
            None => println!("Not logged in."),
        },
        Commands::Onboarding => {
            let status = user::onboarding_status(ctx.authed()?).await?;
            ctx.show(&status, |s| {
                if s.is_onboarded {
                    "Profile complete.\n".to_string()
                } else {
                    "Profile incomplete: set an industry with `coach profile --industry <name>`.\n"
                        .to_string()
                }
            });
        }
        Commands::Profile(args) => {
            let update = ProfileUpdate {
                industry: args.industry,
                experience: args.experience,
                bio: args.bio,
                skills: args.skills,
            };
            let updated = user::update_profile(ctx.authed()?, ctx.llm.as_ref(), &update).await?;
            ctx.show(&updated, render::user);
        }
        Commands::Dashboard => {
            let data = dashboard::dashboard(ctx.authed()?).await?;
            ctx.show(&data, render::dashboard);
        }
        Commands::Insights(args) => {
            let insights = match args.industry {
                Some(industry) => {
                    dashboard::generate_ai_insights(ctx.llm.as_ref(), &industry).await
                }
                None => dashboard::industry_insights(ctx.authed()?, ctx.llm.as_ref()).await?,
            };
            ctx.show(&insights, render::insights);
        }
        Commands::Skills => {
            let demand = dashboard::skills_demand(ctx.authed()?).await?;
            ctx.show(&demand, render::skills);
        }
        Commands::Quiz { action } => run_quiz(ctx, action).await?,
        Commands::Interview { action } => run_interview(ctx, action).await?,
        Commands::Resume { action } => run_resume(ctx, action).await?,
        Commands::CoverLetter { action } => run_cover_letter(ctx, action).await?,
    }
    Ok(())
}

async fn run_quiz(ctx: &Context, action: QuizCommands) -> anyhow::Result<()> {
    let api = ctx.authed()?;
    match action {
        QuizCommands::Categories => {
            let categories = quiz::categories(api).await?;
            ctx.show(&categories, |c| render::categories(c));
        }
        QuizCommands::Stats => {
            let stats = quiz::stats(api).await?;
            ctx.show(&stats, render::stats);
        }
        QuizCommands::Seed => {
            let seeded = quiz::seed(api).await?;
            info!("Quiz data seeded");
            println!(
                "{}",
                seeded.message.as_deref().unwrap_or("Quiz data seeded.")
            );
        }
        QuizCommands::Take { category } => {
            interactive::take_quiz(api.clone(), QuizMode::FullCategory, &category, ctx.json)
                .await?;
        }
    }
    Ok(())
}

async fn run_interview(ctx: &Context, action: InterviewCommands) -> anyhow::Result<()> {
    let api = ctx.authed()?;
    match action {
        InterviewCommands::Practice { category } => {
            interactive::take_quiz(api.clone(), QuizMode::SingleQuestion, &category, ctx.json)
                .await?;
        }
        InterviewCommands::Generate => {
            interactive::generated_interview(api, ctx.llm.as_ref(), ctx.json).await?;
        }
        InterviewCommands::Assessments => {
            let assessments = interview::assessments(api).await?;
            ctx.show(&assessments, |a| render::assessments(a));
        }
    }
    Ok(())
}

async fn run_resume(ctx: &Context, action: ResumeCommands) -> anyhow::Result<()> {
    match action {
        ResumeCommands::Analyze {
            file,
            job_description,
        } => {
            let upload = ResumeUpload {
                file: Some(file),
                job_description,
            };
            let analysis = resume::analyze(ctx.authed()?, &upload).await?;
            ctx.show(&analysis, render::analysis);
        }
        ResumeCommands::Save { file } => {
            let content = read_text(&file).await?;
            let saved = resume::save(ctx.authed()?, &content).await?;
            println!("Saved resume {}", saved.id.as_deref().unwrap_or(""));
        }
        ResumeCommands::History => {
            let history = resume::history(ctx.authed()?).await?;
            ctx.show(&history, |h| render::resumes(h));
        }
        ResumeCommands::Improve { kind, text } => {
            let improved = resume::improve_with_ai(ctx.llm.as_ref(), &text, &kind).await?;
            println!("{improved}");
        }
    }
    Ok(())
}

async fn run_cover_letter(ctx: &Context, action: CoverLetterCommands) -> anyhow::Result<()> {
    let api = ctx.authed()?;
    match action {
        CoverLetterCommands::Generate(args) => {
            let job_description = match args.description.strip_prefix('@') {
                Some(path) => read_text(Path::new(path)).await?,
                None => args.description,
            };
            let request = CoverLetterRequest {
                job_title: args.job_title,
                company_name: args.company,
                job_description,
            };
            let letter = cover_letter::generate(api, ctx.llm.as_ref(), &request).await?;
            ctx.show(&letter, render::cover_letter);
        }
        CoverLetterCommands::List => {
            let letters = cover_letter::list(api).await?;
            ctx.show(&letters, |l| render::cover_letters(l));
        }
        CoverLetterCommands::Show { id } => {
            let letter = cover_letter::get(api, &id).await?;
            ctx.show(&letter, render::cover_letter);
        }
        CoverLetterCommands::Delete { id } => {
            cover_letter::delete(api, &id).await?;
            println!("Deleted cover letter {id}.");
        }
    }
    Ok(())
}

async fn read_text(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("cannot read {}", path.display()))
}
