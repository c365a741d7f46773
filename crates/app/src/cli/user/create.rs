use clap::Args;
use shopfront_app::{
    auth::Registration,
    domain::users::records::{Role, UserUuid},
};

#[derive(Debug, Args)]
pub(crate) struct CreateUserArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Display name
    #[arg(long)]
    name: String,

    /// Login email
    #[arg(long)]
    email: String,

    /// Login password
    #[arg(long, env = "SHOPFRONT_USER_PASSWORD", hide_env_values = true)]
    password: String,

    /// Create the user as an administrator
    #[arg(long)]
    admin: bool,
}

pub(crate) async fn run(args: CreateUserArgs) -> Result<(), String> {
    let service = super::super::auth_service(&args.database_url).await?;

    let role = if args.admin { Role::Admin } else { Role::User };

    let created = service
        .create_user(
            Registration {
                uuid: UserUuid::new(),
                name: args.name,
                email: args.email,
                password: args.password,
            },
            role,
        )
        .await
        .map_err(|error| format!("failed to create user: {error}"))?;

    println!("user_uuid: {}", created.user.uuid);
    println!("user_email: {}", created.user.email);
    println!("user_role: {}", created.user.role);
    println!("token_uuid: {}", created.token.metadata.uuid);
    println!("api_token: {}", created.token.token);
    println!("store this token now; it is only shown once");

    Ok(())
}
