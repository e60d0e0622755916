//! Subcommand handlers.

use anyhow::Context as _;
use dreamhome_api::{ApiClient, SessionStore};
use dreamhome_image_host::Client as ImageHostClient;
use dreamhome_listing::{ListingForm, ListingSubmitter};
use dreamhome_protocol::{SignInRequest, SignUpRequest, User};
use dreamhome_upload::{ImageHostWorker, SelectedFile, StagedFile, upload_avatar};
use tracing::{info, warn};

use crate::adapter::ListingAdapter;
use crate::cli::{CreateListingArgs, Credentials};
use crate::config::{CliConfig, config_path};
use crate::progress::upload_with_bars;

/// Everything a command needs: configuration, the API client and the
/// session it populates.
pub struct Context {
    pub config: CliConfig,
    pub api: ApiClient,
    pub session: SessionStore,
}

impl Context {
    pub fn new(config: CliConfig) -> anyhow::Result<Self> {
        let api = ApiClient::new()?.with_base_url(config.api_base_url.clone());
        Ok(Self {
            config,
            api,
            session: SessionStore::new(),
        })
    }

    fn image_worker(&self) -> anyhow::Result<ImageHostWorker> {
        let client = ImageHostClient::new(&self.config.cloud_name, &self.config.upload_preset)
            .context("invalid image host configuration")?;
        Ok(ImageHostWorker::new(client))
    }
}

pub async fn sign_up(
    ctx: &Context,
    username: String,
    email: String,
    password: String,
) -> anyhow::Result<()> {
    let resp = ctx
        .api
        .sign_up(&SignUpRequest {
            username,
            email,
            password,
        })
        .await?;
    println!("{} ({})", resp.message, resp.user.username);
    Ok(())
}

/// Signs in and records the result in the session.
pub async fn sign_in(ctx: &Context, credentials: &Credentials) -> anyhow::Result<User> {
    ctx.session.sign_in_start();
    let req = SignInRequest {
        email: credentials.email.clone(),
        password: credentials.password.clone(),
    };
    match ctx.api.sign_in(&req).await {
        Ok(user) => {
            ctx.session.sign_in_success(user.clone());
            Ok(user)
        }
        Err(e) => {
            ctx.session.sign_in_failure(e.to_string());
            Err(e.into())
        }
    }
}

pub async fn show_account(ctx: &Context, credentials: &Credentials) -> anyhow::Result<()> {
    let user = sign_in(ctx, credentials).await?;
    println!("Signed in as {} <{}> (id {})", user.username, user.email, user.id);
    if let Some(avatar) = user.avatar {
        println!("Avatar: {avatar}");
    }
    Ok(())
}

pub async fn create_listing(ctx: &Context, args: CreateListingArgs) -> anyhow::Result<()> {
    sign_in(ctx, &args.credentials).await?;

    let mut form = ListingForm::new();
    for (field, value) in args.fields() {
        form.set_field(field, value)
            .with_context(|| format!("invalid value for {field}"))?;
    }

    let selection = args
        .images
        .iter()
        .map(|path| {
            SelectedFile::from_path(path).with_context(|| format!("cannot read {}", path.display()))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let outcome = form.stage_files(selection);
    for message in outcome.messages() {
        eprintln!("skipped: {message}");
    }

    let worker = ctx.image_worker()?;
    let batch = form.staged().to_vec();
    match upload_with_bars(&worker, &batch, form.images().len()).await {
        Ok(images) => {
            form.merge_uploaded(images);
        }
        Err(failure) => {
            if !failure.completed.is_empty() {
                warn!(
                    uploaded = failure.completed.len(),
                    "images uploaded before the failure were not attached"
                );
            }
            return Err(failure.into());
        }
    }

    let user = ctx
        .session
        .current_user()
        .context("you must be signed in to create a listing")?;
    let adapter = ListingAdapter::new(ctx.api.clone());
    let id = ListingSubmitter::new(&adapter).submit(&form, &user).await?;

    info!(listing = %id, "listing published");
    println!("Listing created: {id}");
    Ok(())
}

pub async fn avatar(
    ctx: &Context,
    credentials: &Credentials,
    image: &std::path::Path,
) -> anyhow::Result<()> {
    let user = sign_in(ctx, credentials).await?;

    let file = StagedFile::from(
        SelectedFile::from_path(image)
            .with_context(|| format!("cannot read {}", image.display()))?,
    );
    let worker = ctx.image_worker()?;
    let uploaded = upload_avatar(&worker, &file).await?;

    ctx.session.update_user(User {
        avatar: Some(uploaded.url.clone()),
        ..user
    });
    println!("Avatar uploaded: {}", uploaded.url);
    Ok(())
}

pub fn show_config(config: &CliConfig) -> anyhow::Result<()> {
    println!("# {}", config_path()?.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}
