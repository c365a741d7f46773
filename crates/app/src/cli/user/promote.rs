use clap::Args;

#[derive(Debug, Args)]
pub(crate) struct PromoteUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Email of the user to make an administrator
    #[arg(long)]
    email: String,
}

pub(crate) async fn run(args: PromoteUserArgs) -> Result<(), String> {
    let service = super::super::auth_service(&args.database_url).await?;

    let user = service
        .promote_user(&args.email)
        .await
        .map_err(|error| format!("failed to promote user: {error}"))?;

    println!("user {} ({}) is now {}", user.uuid, user.email, user.role);

    Ok(())
}
