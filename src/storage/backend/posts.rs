//! Post persistence
//!
//! Category and tag ids are stored as JSON arrays, so membership filters match
//! on the quoted id inside the array text.

use std::cmp;

use sea_orm::sea_query::{Expr, Func, Query};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, ExprTrait, FromQueryResult,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
};
use tracing::{debug, error};

use super::converters::{model_to_post, post_to_active_model};
use super::{SeaOrmStorage, retry};
use crate::errors::{LinkfolioError, Result};
use crate::storage::models::{Post, PostFilter, PostStats};

use migration::entities::post;

/// 负数计数收敛为 0
fn non_negative(count: i64) -> u64 {
    cmp::max(count, 0) as u64
}

/// 可原子自增的计数列
#[derive(Debug, Clone, Copy)]
pub enum PostCounter {
    Views,
    Likes,
}

impl PostCounter {
    fn column(self) -> post::Column {
        match self {
            PostCounter::Views => post::Column::Views,
            PostCounter::Likes => post::Column::Likes,
        }
    }
}

#[derive(Debug, FromQueryResult)]
struct StatsResult {
    total: i64,
    published: Option<i64>,
    drafts: Option<i64>,
    archived: Option<i64>,
    total_views: Option<i64>,
    total_likes: Option<i64>,
}

/// 构建文章过滤条件
fn build_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(
            Expr::expr(Func::lower(Expr::col(post::Column::Status))).eq(status.to_lowercase()),
        );
    }

    if let Some(author_id) = filter.author_id.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }

    if let Some(category_id) = filter.category_id.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(post::Column::CategoryIds.contains(format!("\"{}\"", category_id)));
    }

    if let Some(tag_id) = filter.tag_id.as_deref().filter(|s| !s.is_empty()) {
        condition = condition.add(post::Column::TagIds.contains(format!("\"{}\"", tag_id)));
    }

    // search: 标题或摘要，大小写不敏感
    if let Some(search) = filter.search.as_deref().filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        condition = condition.add(
            Condition::any()
                .add(Expr::expr(Func::lower(Expr::col(post::Column::Title))).like(pattern.as_str()))
                .add(
                    Expr::expr(Func::lower(Expr::col(post::Column::Summary)))
                        .like(pattern.as_str()),
                ),
        );
    }

    condition
}

impl SeaOrmStorage {
    pub async fn insert_post(&self, p: &Post) -> Result<()> {
        post::Entity::insert(post_to_active_model(p, true))
            .exec(&self.db)
            .await
            .map_err(|e| LinkfolioError::database_operation(format!("创建文章失败: {}", e)))?;
        self.invalidate_count_cache();
        Ok(())
    }

    pub async fn update_post(&self, p: &Post) -> Result<()> {
        post::Entity::update(post_to_active_model(p, false))
            .exec(&self.db)
            .await
            .map_err(|e| match e {
                sea_orm::DbErr::RecordNotUpdated => {
                    LinkfolioError::not_found(format!("Post not found: {}", p.id))
                }
                other => LinkfolioError::database_operation(format!("更新文章失败: {}", other)),
            })?;
        self.invalidate_count_cache();
        Ok(())
    }

    /// 删除文章，返回是否存在
    pub async fn delete_post(&self, id: &str) -> Result<bool> {
        let result = post::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        self.invalidate_count_cache();
        Ok(result.rows_affected > 0)
    }

    pub async fn find_post_by_id(&self, id: &str) -> Result<Option<Post>> {
        let model = post::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_post))
    }

    pub async fn find_post_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        let db = &self.db;
        let slug_owned = slug.to_string();
        let model = retry::with_retry(
            &format!("find_post_by_slug({})", slug),
            self.retry_config,
            || async {
                post::Entity::find()
                    .filter(post::Column::Slug.eq(slug_owned.as_str()))
                    .one(db)
                    .await
            },
        )
        .await?;
        Ok(model.map(model_to_post))
    }

    /// slug 是否已被其他文章占用
    pub async fn post_slug_taken(&self, slug: &str, exclude_id: Option<&str>) -> Result<bool> {
        let mut query = post::Entity::find().filter(post::Column::Slug.eq(slug));
        if let Some(id) = exclude_id {
            query = query.filter(post::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    /// 带过滤条件的分页查询（按 date 倒序，带 COUNT 缓存）
    pub async fn list_posts(&self, filter: &PostFilter, page: u64, limit: u64) -> Result<(Vec<Post>, u64)> {
        let condition = build_condition(filter);

        let cache_key = format!(
            "posts:s={:?}:a={:?}:c={:?}:t={:?}:q={:?}",
            filter.status, filter.author_id, filter.category_id, filter.tag_id, filter.search
        );

        let total = if let Some(cached) = self.count_cache.get(&cache_key) {
            debug!("count cache hit: key={}, value={}", cache_key, cached);
            cached
        } else {
            let count = post::Entity::find()
                .filter(condition.clone())
                .count(&self.db)
                .await?;
            self.count_cache.insert(cache_key, count);
            count
        };

        let models = post::Entity::find()
            .filter(condition)
            .order_by_desc(post::Column::Date)
            .paginate(&self.db, cmp::max(limit, 1))
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(|e| {
                error!("分页查询文章失败: {}", e);
                LinkfolioError::from(e)
            })?;

        Ok((models.into_iter().map(model_to_post).collect(), total))
    }

    /// 已发布的精选文章
    pub async fn featured_posts(&self, limit: u64) -> Result<Vec<Post>> {
        let models = post::Entity::find()
            .filter(post::Column::Status.eq("published"))
            .filter(post::Column::Featured.eq(true))
            .order_by_desc(post::Column::Date)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_post).collect())
    }

    /// 已发布文章，按浏览量再按点赞数倒序
    pub async fn popular_posts(&self, limit: u64) -> Result<Vec<Post>> {
        let models = post::Entity::find()
            .filter(post::Column::Status.eq("published"))
            .order_by_desc(post::Column::Views)
            .order_by_desc(post::Column::Likes)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_post).collect())
    }

    /// 原子自增 views / likes
    pub async fn increment_post_counter(&self, id: &str, counter: PostCounter) -> Result<bool> {
        let column = counter.column();
        let stmt = Query::update()
            .table(post::Entity)
            .value(column, Expr::col(column).add(Expr::val(1i64)))
            .and_where(Expr::col(post::Column::Id).eq(Expr::val(id)))
            .to_owned();

        let result = self.db.execute(&stmt).await?;
        Ok(result.rows_affected() > 0)
    }

    /// 统计信息（SeaORM DSL 聚合查询）
    pub async fn post_stats(&self, author_id: Option<&str>) -> Result<PostStats> {
        let status_sum = |status: &str| {
            Expr::case(post::Column::Status.eq(status), 1)
                .finally(0)
                .sum()
        };

        let mut query = post::Entity::find()
            .select_only()
            .column_as(post::Column::Id.count(), "total")
            .column_as(status_sum("published"), "published")
            .column_as(status_sum("draft"), "drafts")
            .column_as(status_sum("archived"), "archived")
            .column_as(post::Column::Views.sum(), "total_views")
            .column_as(post::Column::Likes.sum(), "total_likes");

        if let Some(author_id) = author_id {
            query = query.filter(post::Column::AuthorId.eq(author_id));
        }

        let stats = query.into_model::<StatsResult>().one(&self.db).await?;

        Ok(stats
            .map(|s| PostStats {
                total: non_negative(s.total),
                published: non_negative(s.published.unwrap_or(0)),
                drafts: non_negative(s.drafts.unwrap_or(0)),
                archived: non_negative(s.archived.unwrap_or(0)),
                total_views: s.total_views.unwrap_or(0),
                total_likes: s.total_likes.unwrap_or(0),
            })
            .unwrap_or_default())
    }

    /// 引用了某个分类的文章数
    pub async fn count_posts_in_category(&self, category_id: &str) -> Result<u64> {
        let count = post::Entity::find()
            .filter(post::Column::CategoryIds.contains(format!("\"{}\"", category_id)))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn count_posts_with_tag(&self, tag_id: &str) -> Result<u64> {
        let count = post::Entity::find()
            .filter(post::Column::TagIds.contains(format!("\"{}\"", tag_id)))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}
