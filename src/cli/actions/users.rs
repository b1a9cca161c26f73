use crate::{
    api::types::{CreateUserRequest, PaginationParams, UpdateUserRequest, User},
    cli::{actions::Context, globals::GlobalArgs},
    store::{CrudStore, UserStore},
    view::{self, ListView, Pagination},
};
use anyhow::{Context as _, Result};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

#[derive(Debug)]
pub enum Operation {
    List {
        params: PaginationParams,
        view: ListView,
    },
    Get {
        id: u64,
    },
    Create(CreateUserRequest),
    Update {
        id: u64,
        request: UpdateUserRequest,
    },
    Delete {
        id: u64,
        confirmed: bool,
    },
}

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub operation: Operation,
}

/// Execute a users operation. Every operation needs a signed-in session.
/// # Errors
/// Returns an error if no session is stored or the operation fails.
pub async fn execute(args: Args) -> Result<()> {
    let mut ctx = Context::open(&args.globals)?;
    ctx.auth
        .require_session()
        .context("run `reqres-admin login` first")?;

    let mut users = UserStore::new(ctx.queries.clone());
    let mut crud = CrudStore::new();

    let result = run(&ctx, &mut users, &mut crud, args.operation).await;
    ctx.flush()?;
    result
}

async fn run(
    ctx: &Context,
    users: &mut UserStore,
    crud: &mut CrudStore,
    operation: Operation,
) -> Result<()> {
    match operation {
        Operation::List { params, view } => list(users, params, &view).await,
        Operation::Get { id } => {
            let user = find(users, id).await?;
            crud.open_view_modal(user);
            if let Some(user) = &crud.selected_user {
                print!("{}", view::render_user(user));
            }
            crud.close_all_modals();
            Ok(())
        }
        Operation::Create(request) => {
            crud.open_create_modal();
            let created = users.create_user(&request).await?;
            crud.close_all_modals();

            ctx.notifier.success("User created successfully");
            print!("{}", view::render_user(&created.user));
            println!("Job:    {}\nAt:     {}", created.job, created.created_at);
            Ok(())
        }
        Operation::Update { id, request } => {
            let user = find(users, id).await?;
            crud.open_edit_modal(user);
            let updated = users.update_user(id, &request).await?;
            crud.close_all_modals();

            ctx.notifier.success("User updated successfully");
            print!("{}", view::render_user(&updated.user));
            println!("Job:    {}\nAt:     {}", updated.job, updated.updated_at);
            Ok(())
        }
        Operation::Delete { id, confirmed } => {
            let user = find(users, id).await?;
            crud.open_delete_modal(user);
            let Some(target) = crud.user_to_delete.clone() else {
                return Ok(());
            };

            let prompt = format!("Delete {} <{}>? [y/N] ", target.full_name(), target.email);
            if !confirmed && !confirm(&prompt).await? {
                crud.close_all_modals();
                ctx.notifier.info("Delete cancelled");
                return Ok(());
            }

            users.delete_user(target.id).await?;
            crud.close_all_modals();
            ctx.notifier.success("User deleted successfully");
            Ok(())
        }
    }
}

async fn find(users: &mut UserStore, id: u64) -> Result<User> {
    users
        .fetch_user_by_id(id)
        .await?
        .with_context(|| format!("user {id} not found"))
}

async fn list(users: &mut UserStore, params: PaginationParams, list_view: &ListView) -> Result<()> {
    users.fetch_users(params).await?;

    let visible = list_view.apply(&users.users);
    print!("{}", view::render_table(&visible));

    let pagination = Pagination {
        current_page: users.current_page,
        total_pages: users.total_pages,
        total_users: users.total_users,
    };
    println!("{}", pagination.summary());
    if list_view.is_filtered() {
        println!("{} of {} users on this page match", visible.len(), users.users.len());
    }
    if pagination.has_next() {
        println!("Next: --page {}", pagination.current_page + 1);
    }

    Ok(())
}

async fn confirm(prompt: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    stderr.write_all(prompt.as_bytes()).await?;
    stderr.flush().await?;

    let mut answer = String::new();
    BufReader::new(io::stdin()).read_line(&mut answer).await?;
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{types::LoginRequest, ApiConfig, Backend};
    use std::time::Duration;

    fn offline_globals(dir: &tempfile::TempDir) -> GlobalArgs {
        let api = ApiConfig {
            backend: Backend::Offline,
            mock_delay: Duration::ZERO,
            ..ApiConfig::default()
        };
        GlobalArgs::new(api, Some(dir.path().join("auth.json")))
    }

    async fn signed_in(globals: &GlobalArgs) -> Context {
        let mut ctx = Context::open(globals).expect("context");
        let credentials = LoginRequest {
            email: "eve.holt@reqres.in".to_string(),
            password: "cityslicka".to_string(),
        };
        ctx.auth
            .login(ctx.api.as_ref(), Some(ctx.queries.as_ref()), &credentials)
            .await
            .expect("login");
        ctx
    }

    #[test]
    fn accepts_yes_answers_only() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
    }

    #[tokio::test]
    async fn requires_a_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = Args {
            globals: offline_globals(&dir),
            operation: Operation::Get { id: 1 },
        };
        let err = execute(args).await.expect_err("not signed in");
        assert!(err.to_string().contains("login"));
    }

    #[tokio::test]
    async fn create_update_delete_against_mock() {
        let dir = tempfile::tempdir().expect("tempdir");
        let globals = offline_globals(&dir);
        let ctx = signed_in(&globals).await;
        let mut users = UserStore::new(ctx.queries.clone());
        let mut crud = CrudStore::new();

        run(
            &ctx,
            &mut users,
            &mut crud,
            Operation::Create(CreateUserRequest {
                name: "Ada Lovelace".to_string(),
                job: "Engineer".to_string(),
            }),
        )
        .await
        .expect("create");
        assert_eq!(users.total_users, 13);

        run(
            &ctx,
            &mut users,
            &mut crud,
            Operation::Update {
                id: 13,
                request: UpdateUserRequest {
                    name: Some("Ada King".to_string()),
                    job: None,
                },
            },
        )
        .await
        .expect("update");
        let renamed = ctx.api.get_user(13).await.expect("get").data.data;
        assert_eq!(renamed.last_name, "King");

        run(
            &ctx,
            &mut users,
            &mut crud,
            Operation::Delete {
                id: 13,
                confirmed: true,
            },
        )
        .await
        .expect("delete");
        assert!(ctx.api.get_user(13).await.is_err());
        assert_eq!(crud, CrudStore::default());

        let notices: Vec<String> = ctx
            .notifier
            .drain()
            .into_iter()
            .map(|notice| notice.message)
            .collect();
        assert_eq!(
            notices,
            [
                "User created successfully",
                "User updated successfully",
                "User deleted successfully"
            ]
        );
    }

    #[tokio::test]
    async fn get_unknown_user_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ctx = signed_in(&offline_globals(&dir)).await;
        let mut users = UserStore::new(ctx.queries.clone());
        let mut crud = CrudStore::new();

        let result = run(&ctx, &mut users, &mut crud, Operation::Get { id: 99 }).await;
        assert!(result.is_err());
        assert!(crud.open_modal().is_none());
    }
}
