use actix_web::{web, HttpRequest, HttpResponse};
use std::sync::Arc;

use super::{paginate, PageQuery};
use crate::{
    http::{
        cache::PageCache,
        form_data::UploadedFile,
        render::html,
        util::{post_url, redirect},
        Actor, Error, FormData, SessionUser,
    },
    schema::{Group, NewPost, PostChanges, PostFilter, PostView, User},
    storage::{store_image, ImageKind},
    types::{
        form::{
            post::{IMAGE_CONTRADICTION_MESSAGE, INVALID_IMAGE_MESSAGE},
            CommentForm, PostForm,
        },
        id::{GroupId, PostId},
    },
    App,
};

#[tracing::instrument(skip_all, name = "http.posts.index")]
pub async fn index(
    app: web::Data<App>,
    actor: Actor,
    req: HttpRequest,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse, Error> {
    let key = PageCache::key(&req, &actor);
    if let Some(page) = app.pages.get(&key).await {
        return Ok(html(page.as_ref()));
    }

    let page = paginate(&app, PostFilter::All, &query).await?;
    let mut context = app.templates.context(actor.user());
    context.insert("page", &page);
    context.insert("index", &true);

    let body: Arc<str> = app.templates.render("index.html", &context)?.into();
    app.pages.insert(key, body.clone()).await;
    Ok(html(body.as_ref()))
}

/// Finds a post by its URL segments or fails with a 404.
pub(crate) async fn find_post(app: &App, username: &str, post_id: u64) -> Result<PostView, Error> {
    let Some(id) = PostId::new_checked(post_id) else {
        return Err(Error::not_found());
    };

    app.data
        .find_post(username, id)
        .await?
        .ok_or_else(Error::not_found)
}

#[tracing::instrument(skip_all, name = "http.posts.view")]
pub async fn post_view(
    app: web::Data<App>,
    actor: Actor,
    path: web::Path<(String, u64)>,
) -> Result<HttpResponse, Error> {
    let (username, post_id) = path.into_inner();
    let post = find_post(&app, &username, post_id).await?;

    let following = match actor.user() {
        Some(user) => app.data.is_following(user.id, post.author.id).await?,
        None => false,
    };
    let post_count = app
        .data
        .count_posts(PostFilter::Author(post.author.id))
        .await?;
    let comments = app.data.list_comments(post.id).await?;

    let mut context = app.templates.context(actor.user());
    context.insert("author", &post.author);
    context.insert("post", &post);
    context.insert("form", &CommentForm::default());
    context.insert("following", &following);
    context.insert("post_count", &post_count);
    context.insert("comments", &comments);
    Ok(app.templates.page("post.html", &context)?)
}

fn render_form(
    app: &App,
    user: &User,
    form: &PostForm,
    groups: &[Group],
    post: Option<&PostView>,
) -> Result<HttpResponse, Error> {
    let mut context = app.templates.context(Some(user));
    context.insert("form", form);
    context.insert("groups", groups);
    if let Some(post) = post {
        context.insert("post", post);
        context.insert("edit", &true);
    }
    Ok(app.templates.page("new_post.html", &context)?)
}

struct Submitted {
    form: PostForm,
    group_id: Option<GroupId>,
    image: Option<(UploadedFile, ImageKind)>,
}

/// Reads the text fields of a submitted post form and checks
/// the uploaded image, if any.
fn read_form(data: &mut FormData, groups: &[Group]) -> Submitted {
    let mut form = PostForm {
        text: data.get("text").to_string(),
        group: data.get("group").to_string(),
        ..Default::default()
    };
    let group_id = form.check(groups);

    let image = data
        .take_file("image")
        .and_then(|file| match ImageKind::sniff(&file.content) {
            Some(kind) => Some((file, kind)),
            None => {
                form.errors.add("image", INVALID_IMAGE_MESSAGE);
                None
            }
        });

    Submitted {
        form,
        group_id,
        image,
    }
}

async fn save_image(app: &App, image: (UploadedFile, ImageKind)) -> Result<String, Error> {
    let (file, kind) = image;
    let name = store_image(app.storage.as_ref(), &file.file_name, kind, file.content).await?;
    Ok(name)
}

#[tracing::instrument(skip_all, name = "http.posts.new_form")]
pub async fn new_post_form(app: web::Data<App>, user: SessionUser) -> Result<HttpResponse, Error> {
    let groups = app.data.list_groups().await?;
    render_form(&app, &user, &PostForm::default(), &groups, None)
}

#[tracing::instrument(skip_all, name = "http.posts.new")]
pub async fn new_post(
    app: web::Data<App>,
    user: SessionUser,
    mut data: FormData,
) -> Result<HttpResponse, Error> {
    let groups = app.data.list_groups().await?;
    let Submitted {
        form,
        group_id,
        image,
    } = read_form(&mut data, &groups);
    if !form.errors.is_empty() {
        return render_form(&app, &user, &form, &groups, None);
    }

    let image = match image {
        Some(image) => Some(save_image(&app, image).await?),
        None => None,
    };

    let post = app
        .data
        .create_post(&NewPost {
            text: form.text.trim(),
            image: image.as_deref(),
            author_id: user.id,
            group_id,
        })
        .await?;

    tracing::info!(post.id = %post.id, "created post");
    Ok(redirect("/"))
}

#[tracing::instrument(skip_all, name = "http.posts.edit_form")]
pub async fn post_edit_form(
    app: web::Data<App>,
    user: SessionUser,
    path: web::Path<(String, u64)>,
) -> Result<HttpResponse, Error> {
    let (username, post_id) = path.into_inner();
    let post = find_post(&app, &username, post_id).await?;
    if post.author.id != user.id {
        return Ok(redirect(&post_url(&post.author.username, post.id)));
    }

    let groups = app.data.list_groups().await?;
    render_form(&app, &user, &PostForm::from_post(&post), &groups, Some(&post))
}

#[tracing::instrument(skip_all, name = "http.posts.edit")]
pub async fn post_edit(
    app: web::Data<App>,
    user: SessionUser,
    path: web::Path<(String, u64)>,
    mut data: FormData,
) -> Result<HttpResponse, Error> {
    let (username, post_id) = path.into_inner();
    let post = find_post(&app, &username, post_id).await?;
    let url = post_url(&post.author.username, post.id);
    if post.author.id != user.id {
        return Ok(redirect(&url));
    }

    let groups = app.data.list_groups().await?;
    let Submitted {
        mut form,
        group_id,
        image,
    } = read_form(&mut data, &groups);
    let clear_image = data.contains("image-clear");
    if clear_image && image.is_some() {
        form.errors.add("image", IMAGE_CONTRADICTION_MESSAGE);
    }
    if !form.errors.is_empty() {
        return render_form(&app, &user, &form, &groups, Some(&post));
    }

    let image = match image {
        Some(image) => Some(save_image(&app, image).await?),
        None if clear_image => None,
        None => post.image.clone(),
    };

    app.data
        .update_post(
            post.id,
            &PostChanges {
                text: form.text.trim(),
                image: image.as_deref(),
                group_id,
            },
        )
        .await?
        .ok_or_else(Error::not_found)?;

    Ok(redirect(&url))
}
