//! Solarstore storefront CLI

#![expect(
    clippy::print_stdout,
    clippy::print_stderr,
    reason = "command results and errors are written to the terminal"
)]

use std::{
    fs, io,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Args, Parser, Subcommand, ValueEnum};
use jiff::Timestamp;
use thiserror::Error;
use tracing::info;

use solarstore::{
    assets::{AssetFolder, asset_url},
    cart::{CartEngine, CartError, QuantityUpdate},
    checkout::CheckoutDecision,
    dealers::{DocumentKind, StatusAction, UploadFile},
    pagination::paginate,
    products::{Product, ProductId},
    quotation::{QuoteForm, RequesterIdentity},
    session::{Capability, Session, SessionError, allows},
};
use solarstore_app::{
    api::{ApiError, Credentials},
    config::{ClientConfig, load_dotenv},
    context::AppContext,
    observability::{ObservabilityError, init_subscriber},
    render,
    services::{DealerService, QuoteOutcome, ServiceError, checkout},
    store::{FileStore, FileStoreError},
};

#[derive(Debug, Parser)]
#[command(name = "solarstore", about = "Solar storefront client", long_about = None)]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and persist the session
    Login(LoginArgs),

    /// Forget the persisted session
    Logout,

    /// Show the persisted session
    Whoami,

    /// Manage the cart
    Cart(CartCommand),

    /// Check out the cart
    Checkout(IdentityArgs),

    /// Request a quote for one product
    Quote(QuoteArgs),

    /// List quotations (admin)
    Quotations(QuotationsArgs),

    /// Dealer registration and verification
    Dealer(DealerCommand),

    /// Print the URL of a static asset
    AssetUrl(AssetUrlArgs),
}

#[derive(Debug, Args)]
struct LoginArgs {
    /// Account email
    #[arg(long)]
    email: String,

    /// Account password
    #[arg(long, env = "SOLARSTORE_PASSWORD")]
    password: String,
}

#[derive(Debug, Args)]
struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add one unit of a product
    Add(CartAddArgs),

    /// Set the quantity of a product
    Update {
        /// Product id
        product_id: u64,

        /// New quantity
        quantity: u32,
    },

    /// Remove a product
    Remove {
        /// Product id
        product_id: u64,
    },

    /// Show the cart
    Show,

    /// Empty the cart
    Clear,
}

#[derive(Debug, Args)]
struct CartAddArgs {
    /// Product id
    product_id: u64,

    /// Product name; fetched from the API when omitted
    #[arg(long)]
    name: Option<String>,

    /// Comma-separated product images
    #[arg(long)]
    images: Option<String>,
}

#[derive(Debug, Args)]
struct IdentityArgs {
    /// Requester name; defaults to the session user
    #[arg(long)]
    name: Option<String>,

    /// Requester address; defaults to the session user
    #[arg(long)]
    address: Option<String>,

    /// Requester email; defaults to the session user
    #[arg(long)]
    email: Option<String>,

    /// Requester phone; defaults to the session user
    #[arg(long)]
    phone: Option<String>,

    /// Free-text notes
    #[arg(long, default_value = "")]
    notes: String,
}

#[derive(Debug, Args)]
struct QuoteArgs {
    /// Product id
    product_id: u64,

    /// Quantity
    #[arg(long, default_value = "1")]
    quantity: String,

    #[command(flatten)]
    identity: IdentityArgs,
}

#[derive(Debug, Args)]
struct QuotationsArgs {
    /// Page number, from 1
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Quotations per page
    #[arg(long, default_value_t = 10)]
    per_page: usize,
}

#[derive(Debug, Args)]
struct DealerCommand {
    #[command(subcommand)]
    command: DealerSubcommand,
}

#[derive(Debug, Subcommand)]
enum DealerSubcommand {
    /// Show registration progress
    Progress {
        /// Dealer id
        dealer_id: u64,
    },

    /// List the status actions offered for a dealer
    Actions {
        /// Dealer id
        dealer_id: u64,
    },

    /// Change registration status (admin)
    SetStatus {
        /// Dealer id
        dealer_id: u64,

        /// Action to apply
        action: ActionArg,
    },

    /// Upload registration documents (dealer)
    Upload {
        /// Dealer id
        dealer_id: u64,

        /// Document field
        document: DocumentArg,

        /// Files to upload
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ActionArg {
    Approve,
    Suspend,
    Reinstate,
}

impl From<ActionArg> for StatusAction {
    fn from(value: ActionArg) -> Self {
        match value {
            ActionArg::Approve => StatusAction::Approve,
            ActionArg::Suspend => StatusAction::Suspend,
            ActionArg::Reinstate => StatusAction::Reinstate,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DocumentArg {
    TaxClearance,
    CertificateOfIncorporation,
    DirectorIds,
}

impl From<DocumentArg> for DocumentKind {
    fn from(value: DocumentArg) -> Self {
        match value {
            DocumentArg::TaxClearance => DocumentKind::TaxClearance,
            DocumentArg::CertificateOfIncorporation => DocumentKind::CertificateOfIncorporation,
            DocumentArg::DirectorIds => DocumentKind::DirectorIds,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FolderArg {
    Products,
    Team,
    Testimonials,
    Awards,
    Certificates,
    Dealers,
    Blogs,
    Articles,
}

impl From<FolderArg> for AssetFolder {
    fn from(value: FolderArg) -> Self {
        match value {
            FolderArg::Products => AssetFolder::Products,
            FolderArg::Team => AssetFolder::Team,
            FolderArg::Testimonials => AssetFolder::Testimonials,
            FolderArg::Awards => AssetFolder::Awards,
            FolderArg::Certificates => AssetFolder::Certificates,
            FolderArg::Dealers => AssetFolder::Dealers,
            FolderArg::Blogs => AssetFolder::Blogs,
            FolderArg::Articles => AssetFolder::Articles,
        }
    }
}

#[derive(Debug, Args)]
struct AssetUrlArgs {
    /// Asset folder
    folder: FolderArg,

    /// File name
    file_name: String,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Observability(#[from] ObservabilityError),

    #[error(transparent)]
    Store(#[from] FileStoreError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Cart(#[from] CartError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("failed to read {}", path.display())]
    ReadFile {
        path: PathBuf,
        source: io::Error,
    },

    #[error("failed to write output")]
    Output(#[from] io::Error),

    #[error("{0}")]
    Denied(&'static str),
}

#[tokio::main]
async fn main() -> ExitCode {
    load_dotenv();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");

            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    init_subscriber(&cli.config.logging)?;

    let mut store = FileStore::open(&cli.config.storage.store_path)?;
    let session = Session::load(&store)?;
    let ctx = AppContext::from_config(&cli.config.api, session.as_ref());
    let now = Timestamp::now();

    match cli.command {
        Commands::Login(args) => login(&ctx, &mut store, args).await,
        Commands::Logout => {
            Session::clear(&mut store)?;
            println!("Signed out.");

            Ok(())
        }
        Commands::Whoami => {
            match &session {
                Some(session) => println!(
                    "{} <{}> ({:?})",
                    session.user.full_name,
                    session.user.email,
                    session.role()
                ),
                None => println!("Not signed in."),
            }

            Ok(())
        }
        Commands::Cart(CartCommand { command }) => {
            cart(&ctx, &cli.config, &mut store, command, now).await
        }
        Commands::Checkout(identity) => {
            checkout_cart(&ctx, &cli.config, &mut store, session.as_ref(), identity, now).await
        }
        Commands::Quote(args) => quote(&ctx, session.as_ref(), args).await,
        Commands::Quotations(args) => {
            if !allows(session.as_ref(), Capability::AdminDashboard) {
                return Err(CliError::Denied("quotations are only visible to admins"));
            }

            let quotations = ctx.api.list_quotations().await?;
            let page = paginate(&quotations, args.page, args.per_page);

            render::write_quotations(&mut io::stdout().lock(), &page)?;

            Ok(())
        }
        Commands::Dealer(DealerCommand { command }) => {
            dealer(&ctx, session.as_ref(), command).await
        }
        Commands::AssetUrl(args) => {
            println!(
                "{}",
                asset_url(
                    &cli.config.api.asset_base_url,
                    args.folder.into(),
                    &args.file_name
                )
            );

            Ok(())
        }
    }
}

async fn login(ctx: &AppContext, store: &mut FileStore, args: LoginArgs) -> Result<(), CliError> {
    let response = ctx
        .api
        .login(&Credentials {
            email: args.email,
            password: args.password,
        })
        .await?;

    let session = Session::new(response.user, Some(response.token));
    session.save(store)?;

    info!(user = session.user.id, role = ?session.role(), "signed in");
    println!("Signed in as {}.", session.user.full_name);

    Ok(())
}

async fn checkout_cart(
    ctx: &AppContext,
    config: &ClientConfig,
    store: &mut FileStore,
    session: Option<&Session>,
    identity: IdentityArgs,
    now: Timestamp,
) -> Result<(), CliError> {
    let outcome = checkout(store, &config.messaging.target(), now)?;

    match outcome.decision {
        CheckoutDecision::EmptyCart => println!("Your cart is empty."),
        CheckoutDecision::DeepLink(url) => {
            println!("Send your order on WhatsApp:");
            println!("{url}");
        }
        CheckoutDecision::InternalCheckout => {
            let session = session.ok_or(CliError::Denied("sign in first"))?;
            let mut form = identity.into_form(Some(session));

            let outcome = ctx
                .quotes
                .request_cart_quote(store, &mut form, session, now)
                .await?;

            print_quote_outcome(&outcome);
        }
    }

    Ok(())
}

async fn quote(ctx: &AppContext, session: Option<&Session>, args: QuoteArgs) -> Result<(), CliError> {
    let product = ctx.api.get_product(ProductId(args.product_id)).await?;
    let mut form = QuoteForm {
        quantity: args.quantity,
        ..args.identity.into_form(session)
    };

    let outcome = ctx.quotes.request_quote(&product, &mut form, session).await;

    print_quote_outcome(&outcome);

    Ok(())
}

async fn cart(
    ctx: &AppContext,
    config: &ClientConfig,
    store: &mut FileStore,
    command: CartSubcommand,
    now: Timestamp,
) -> Result<(), CliError> {
    let mut engine = CartEngine::new(store);

    match command {
        CartSubcommand::Add(args) => {
            let product = match (args.name, args.images) {
                (Some(name), images) => {
                    Product::new(args.product_id, name, images.unwrap_or_default())
                }
                (None, _) => ctx.api.get_product(ProductId(args.product_id)).await?,
            };

            let cart = engine.add_item(&product, now)?;

            println!(
                "Added {}. {} line(s) in cart.",
                product.product_name,
                cart.items.len()
            );
        }
        CartSubcommand::Update {
            product_id,
            quantity,
        } => match engine.update_quantity(ProductId(product_id), quantity, now)? {
            QuantityUpdate::Updated => println!("Quantity updated."),
            QuantityUpdate::BelowFloor => println!("Quantity must be at least 1."),
            QuantityUpdate::CartMissing => println!("Your cart is empty."),
            QuantityUpdate::LineMissing => println!("Product {product_id} is not in the cart."),
        },
        CartSubcommand::Remove { product_id } => {
            if engine.remove_item(ProductId(product_id), now)? {
                println!("Removed product {product_id}.");
            } else {
                println!("Product {product_id} is not in the cart.");
            }
        }
        CartSubcommand::Show => {
            let view = engine.view(now)?;

            render::write_cart(&mut io::stdout().lock(), &view, &config.api.asset_base_url)?;
        }
        CartSubcommand::Clear => {
            engine.clear()?;
            println!("Cart cleared.");
        }
    }

    Ok(())
}

async fn dealer(
    ctx: &AppContext,
    session: Option<&Session>,
    command: DealerSubcommand,
) -> Result<(), CliError> {
    match command {
        DealerSubcommand::Progress { dealer_id } => {
            let progress = ctx.dealers.registration_progress(dealer_id).await?;
            let actions = DealerService::offered_actions(session, &progress.dealer);

            render::write_progress(&mut io::stdout().lock(), &progress, &actions)?;
        }
        DealerSubcommand::Actions { dealer_id } => {
            let dealer = ctx.api.get_dealer(dealer_id).await?;
            let actions = DealerService::offered_actions(session, &dealer);

            if actions.is_empty() {
                println!("No actions available for {}.", dealer.display_name());
            }

            for action in actions {
                println!("{} -> {}", action.label(), action.target());
            }
        }
        DealerSubcommand::SetStatus { dealer_id, action } => {
            let status = ctx
                .dealers
                .apply_action(session, dealer_id, action.into())
                .await?;

            println!("Dealer {dealer_id} is now {status}.");
        }
        DealerSubcommand::Upload {
            dealer_id,
            document,
            files,
        } => {
            let files = files
                .iter()
                .map(PathBuf::as_path)
                .map(read_upload)
                .collect::<Result<Vec<_>, _>>()?;

            let progress = ctx
                .dealers
                .upload_documents(session, dealer_id, document.into(), files)
                .await?;

            render::write_progress(&mut io::stdout().lock(), &progress, &[])?;
        }
    }

    Ok(())
}

fn read_upload(path: &Path) -> Result<UploadFile, CliError> {
    let bytes = fs::read(path).map_err(|source| CliError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(UploadFile::new(file_name, bytes))
}

fn print_quote_outcome(outcome: &QuoteOutcome) {
    match outcome {
        QuoteOutcome::Submitted { message, .. } | QuoteOutcome::Failed { message } => {
            println!("{message}");
        }
        QuoteOutcome::Invalid(invalid) => println!("{invalid}"),
        QuoteOutcome::EmptyCart => println!("Your cart is empty."),
    }
}

impl IdentityArgs {
    fn into_form(self, session: Option<&Session>) -> QuoteForm {
        let prefilled = QuoteForm::prefilled(session);

        QuoteForm {
            identity: RequesterIdentity {
                name: self.name.unwrap_or(prefilled.identity.name),
                address: self.address.unwrap_or(prefilled.identity.address),
                email: self.email.unwrap_or(prefilled.identity.email),
                phone: self.phone.unwrap_or(prefilled.identity.phone),
            },
            notes: self.notes,
            ..prefilled
        }
    }
}
