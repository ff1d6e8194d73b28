//! Sea-ORM Model 与领域类型互转

use sea_orm::ActiveValue::{NotSet, Set};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::storage::models::{
    Admin, Announcement, Author, Category, GuestbookEntry, PageVisit, Post, Profile, QrCode,
    QrScan, Resume, Tag,
};
use migration::entities::{
    admin, announcement, author, category, guestbook_entry, page_visit, post, profile, qr_code,
    qr_scan, resume, tag,
};

/// 解析 JSON 数组列，非法内容视为空列表
pub fn parse_json_list<T: DeserializeOwned>(raw: &str) -> Vec<T> {
    serde_json::from_str(raw).unwrap_or_default()
}

/// 序列化为 JSON 数组列
pub fn to_json_list<T: Serialize>(items: &[T]) -> String {
    serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string())
}

pub fn model_to_profile(model: profile::Model) -> Profile {
    Profile {
        showcase_items: parse_json_list(&model.showcase_items),
        custom_links: parse_json_list(&model.custom_links),
        id: model.id,
        display_name: model.display_name,
        tagline: model.tagline,
        avatar_url: model.avatar_url,
        background_url: model.background_url,
        theme: model.theme,
        resume_url: model.resume_url,
        selected_resume_id: model.selected_resume_id,
        linkedin_url: model.linkedin_url,
        instagram_url: model.instagram_url,
        twitter_url: model.twitter_url,
        github_url: model.github_url,
        email_url: model.email_url,
        showcase_title: model.showcase_title,
        short_code: model.short_code,
        qr_code_url: model.qr_code_url,
        is_active: model.is_active,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn profile_to_active_model(p: &Profile, is_new: bool) -> profile::ActiveModel {
    profile::ActiveModel {
        id: Set(p.id.clone()),
        display_name: Set(p.display_name.clone()),
        tagline: Set(p.tagline.clone()),
        avatar_url: Set(p.avatar_url.clone()),
        background_url: Set(p.background_url.clone()),
        theme: Set(p.theme.clone()),
        resume_url: Set(p.resume_url.clone()),
        selected_resume_id: Set(p.selected_resume_id.clone()),
        linkedin_url: Set(p.linkedin_url.clone()),
        instagram_url: Set(p.instagram_url.clone()),
        twitter_url: Set(p.twitter_url.clone()),
        github_url: Set(p.github_url.clone()),
        email_url: Set(p.email_url.clone()),
        showcase_title: Set(p.showcase_title.clone()),
        showcase_items: Set(to_json_list(&p.showcase_items)),
        custom_links: Set(to_json_list(&p.custom_links)),
        short_code: Set(p.short_code.clone()),
        qr_code_url: Set(p.qr_code_url.clone()),
        is_active: Set(p.is_active),
        created_at: if is_new { Set(p.created_at) } else { NotSet },
        updated_at: Set(p.updated_at),
    }
}

pub fn model_to_qr_code(model: qr_code::Model) -> QrCode {
    QrCode {
        id: model.id,
        qr_id: model.qr_id,
        profile_id: model.profile_id,
        qr_code_url: model.qr_code_url,
        qr_theme: model.qr_theme,
        is_active: model.is_active,
        total_scans: model.total_scans,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn qr_code_to_active_model(qr: &QrCode) -> qr_code::ActiveModel {
    qr_code::ActiveModel {
        id: Set(qr.id.clone()),
        qr_id: Set(qr.qr_id.clone()),
        profile_id: Set(qr.profile_id.clone()),
        qr_code_url: Set(qr.qr_code_url.clone()),
        qr_theme: Set(qr.qr_theme.clone()),
        is_active: Set(qr.is_active),
        total_scans: Set(qr.total_scans),
        created_at: Set(qr.created_at),
        updated_at: Set(qr.updated_at),
    }
}

pub fn model_to_qr_scan(model: qr_scan::Model) -> QrScan {
    QrScan {
        id: model.id,
        qr_code_id: model.qr_code_id,
        session_id: model.session_id,
        ip_hash: model.ip_hash,
        user_agent: model.user_agent,
        device: model.device,
        browser: model.browser,
        os: model.os,
        country: model.country,
        referrer: model.referrer,
        created_at: model.created_at,
    }
}

pub fn model_to_post(model: post::Model) -> Post {
    Post {
        category_ids: parse_json_list(&model.category_ids),
        tag_ids: parse_json_list(&model.tag_ids),
        gallery: parse_json_list(&model.gallery),
        id: model.id,
        title: model.title,
        slug: model.slug,
        content: model.content,
        summary: model.summary,
        author_id: model.author_id,
        post_type: model.post_type,
        cover_image: model.cover_image,
        status: model.status,
        pricing: model.pricing,
        price: model.price,
        access_level: model.access_level,
        featured: model.featured,
        minute_read: model.minute_read,
        views: model.views,
        likes: model.likes,
        date: model.date,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

/// 计数列（views / likes）只在插入时写入，更新走原子自增
pub fn post_to_active_model(p: &Post, is_new: bool) -> post::ActiveModel {
    post::ActiveModel {
        id: Set(p.id.clone()),
        title: Set(p.title.clone()),
        slug: Set(p.slug.clone()),
        content: Set(p.content.clone()),
        summary: Set(p.summary.clone()),
        author_id: Set(p.author_id.clone()),
        category_ids: Set(to_json_list(&p.category_ids)),
        tag_ids: Set(to_json_list(&p.tag_ids)),
        post_type: Set(p.post_type.clone()),
        cover_image: Set(p.cover_image.clone()),
        gallery: Set(to_json_list(&p.gallery)),
        status: Set(p.status.clone()),
        pricing: Set(p.pricing.clone()),
        price: Set(p.price),
        access_level: Set(p.access_level.clone()),
        featured: Set(p.featured),
        minute_read: Set(p.minute_read),
        views: if is_new { Set(p.views) } else { NotSet },
        likes: if is_new { Set(p.likes) } else { NotSet },
        date: Set(p.date),
        created_at: if is_new { Set(p.created_at) } else { NotSet },
        updated_at: Set(p.updated_at),
    }
}

pub fn model_to_category(model: category::Model) -> Category {
    Category {
        id: model.id,
        cat_id: model.cat_id,
        name: model.name,
        slug: model.slug,
        created_at: model.created_at,
    }
}

pub fn category_to_active_model(c: &Category) -> category::ActiveModel {
    category::ActiveModel {
        id: Set(c.id.clone()),
        cat_id: Set(c.cat_id.clone()),
        name: Set(c.name.clone()),
        slug: Set(c.slug.clone()),
        created_at: Set(c.created_at),
    }
}

pub fn model_to_tag(model: tag::Model) -> Tag {
    Tag {
        id: model.id,
        tag_id: model.tag_id,
        name: model.name,
        created_at: model.created_at,
    }
}

pub fn tag_to_active_model(t: &Tag) -> tag::ActiveModel {
    tag::ActiveModel {
        id: Set(t.id.clone()),
        tag_id: Set(t.tag_id.clone()),
        name: Set(t.name.clone()),
        created_at: Set(t.created_at),
    }
}

pub fn model_to_author(model: author::Model) -> Author {
    Author {
        id: model.id,
        author_id: model.author_id,
        username: model.username,
        email: model.email,
        author_name: model.author_name,
        author_profession: model.author_profession,
        description: model.description,
        avatar: model.avatar,
        linkedin: model.linkedin,
        github: model.github,
        twitter: model.twitter,
        website: model.website,
        password: model.password,
        role: model.role,
        must_change_password: model.must_change_password,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn author_to_active_model(a: &Author, is_new: bool) -> author::ActiveModel {
    author::ActiveModel {
        id: Set(a.id.clone()),
        author_id: Set(a.author_id.clone()),
        username: Set(a.username.clone()),
        email: Set(a.email.clone()),
        author_name: Set(a.author_name.clone()),
        author_profession: Set(a.author_profession.clone()),
        description: Set(a.description.clone()),
        avatar: Set(a.avatar.clone()),
        linkedin: Set(a.linkedin.clone()),
        github: Set(a.github.clone()),
        twitter: Set(a.twitter.clone()),
        website: Set(a.website.clone()),
        password: Set(a.password.clone()),
        role: Set(a.role.clone()),
        must_change_password: Set(a.must_change_password),
        created_at: if is_new { Set(a.created_at) } else { NotSet },
        updated_at: Set(a.updated_at),
    }
}

pub fn model_to_admin(model: admin::Model) -> Admin {
    Admin {
        id: model.id,
        username: model.username,
        password: model.password,
        email: model.email,
        role: model.role,
        created_at: model.created_at,
    }
}

pub fn admin_to_active_model(a: &Admin, is_new: bool) -> admin::ActiveModel {
    admin::ActiveModel {
        id: Set(a.id.clone()),
        username: Set(a.username.clone()),
        password: Set(a.password.clone()),
        email: Set(a.email.clone()),
        role: Set(a.role.clone()),
        created_at: if is_new { Set(a.created_at) } else { NotSet },
    }
}

pub fn model_to_guestbook_entry(model: guestbook_entry::Model) -> GuestbookEntry {
    GuestbookEntry {
        id: model.id,
        author: model.author,
        content: model.content,
        approved: model.approved,
        created_at: model.created_at,
    }
}

pub fn model_to_page_visit(model: page_visit::Model) -> PageVisit {
    PageVisit {
        id: model.id,
        path: model.path,
        referrer: model.referrer,
        user_agent: model.user_agent,
        ip_hash: model.ip_hash,
        country: model.country,
        device: model.device,
        browser: model.browser,
        os: model.os,
        created_at: model.created_at,
    }
}

pub fn model_to_announcement(model: announcement::Model) -> Announcement {
    Announcement {
        id: model.id,
        title: model.title,
        description: model.description,
        background_url: model.background_url,
        link_url: model.link_url,
        link_text: model.link_text,
        order: model.order,
        is_active: model.is_active,
        slot: model.slot,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn announcement_to_active_model(a: &Announcement, is_new: bool) -> announcement::ActiveModel {
    announcement::ActiveModel {
        id: Set(a.id.clone()),
        title: Set(a.title.clone()),
        description: Set(a.description.clone()),
        background_url: Set(a.background_url.clone()),
        link_url: Set(a.link_url.clone()),
        link_text: Set(a.link_text.clone()),
        order: Set(a.order),
        is_active: Set(a.is_active),
        slot: Set(a.slot.clone()),
        created_at: if is_new { Set(a.created_at) } else { NotSet },
        updated_at: Set(a.updated_at),
    }
}

pub fn model_to_resume(model: resume::Model) -> Resume {
    Resume {
        id: model.id,
        title: model.title,
        html_content: model.html_content,
        file_name: model.file_name,
        content_type: model.content_type,
        pdf_url: model.pdf_url,
        pdf_data: model.pdf_data,
        version: model.version,
        is_active: model.is_active,
        order: model.order,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

pub fn resume_to_active_model(r: &Resume, is_new: bool) -> resume::ActiveModel {
    resume::ActiveModel {
        id: Set(r.id.clone()),
        title: Set(r.title.clone()),
        html_content: Set(r.html_content.clone()),
        file_name: Set(r.file_name.clone()),
        content_type: Set(r.content_type.clone()),
        pdf_url: Set(r.pdf_url.clone()),
        pdf_data: Set(r.pdf_data.clone()),
        version: Set(r.version),
        is_active: Set(r.is_active),
        order: Set(r.order),
        created_at: if is_new { Set(r.created_at) } else { NotSet },
        updated_at: Set(r.updated_at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::{CustomLink, ShowcaseItem};
    use chrono::Utc;
    use sea_orm::ActiveValue;

    fn profile_model(showcase: &str, links: &str) -> profile::Model {
        let now = Utc::now();
        profile::Model {
            id: "p1".to_string(),
            display_name: "Jane".to_string(),
            tagline: None,
            avatar_url: None,
            background_url: None,
            theme: "dark".to_string(),
            resume_url: None,
            selected_resume_id: None,
            linkedin_url: None,
            instagram_url: None,
            twitter_url: None,
            github_url: None,
            email_url: None,
            showcase_title: "My Current Work".to_string(),
            showcase_items: showcase.to_string(),
            custom_links: links.to_string(),
            short_code: "abcd1234".to_string(),
            qr_code_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_invalid_json_columns_become_empty() {
        let p = model_to_profile(profile_model("not json", "{\"x\":1}"));
        assert!(p.showcase_items.is_empty());
        assert!(p.custom_links.is_empty());
    }

    #[test]
    fn test_json_columns_parse() {
        let p = model_to_profile(profile_model(
            r#"[{"name":"Site","url":"https://example.com"}]"#,
            r#"[{"title":"Blog","url":"/blog","color":"red"}]"#,
        ));
        assert_eq!(
            p.showcase_items,
            vec![ShowcaseItem {
                name: "Site".to_string(),
                url: "https://example.com".to_string(),
                description: None,
                icon: None,
            }]
        );
        assert_eq!(
            p.custom_links,
            vec![CustomLink {
                title: "Blog".to_string(),
                url: "/blog".to_string(),
                icon: None,
                color: Some("red".to_string()),
            }]
        );
    }

    #[test]
    fn test_profile_update_keeps_created_at() {
        let p = model_to_profile(profile_model("[]", "[]"));
        let am = profile_to_active_model(&p, false);
        assert!(matches!(am.created_at, ActiveValue::NotSet));
        let am = profile_to_active_model(&p, true);
        assert!(matches!(am.created_at, ActiveValue::Set(_)));
    }

    #[test]
    fn test_to_json_list() {
        assert_eq!(to_json_list::<String>(&[]), "[]");
        assert_eq!(
            to_json_list(&["a".to_string(), "b".to_string()]),
            r#"["a","b"]"#
        );
    }
}
