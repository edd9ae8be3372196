//! Server-rendered HTML pages.

use std::fmt::Write;

use shared::models::{Schedule, User};

use crate::auth::Principal;
use crate::grid::AvailabilityGrid;

/// Escape text for use in HTML element content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn layout(title: &str, principal: Option<&Principal>, body: &str) -> String {
    let nav = match principal {
        Some(p) => format!(
            r#"<span class="username">{}</span> <a href="/logout">ログアウト</a>"#,
            escape_html(&p.username)
        ),
        None => r#"<a href="/login">ログイン</a>"#.to_string(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="ja">
<head>
<meta charset="utf-8">
<title>{title}</title>
</head>
<body>
<nav><a href="/">予定調整</a> {nav}</nav>
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape_html(title),
        nav = nav,
        body = body,
    )
}

pub fn login_page(principal: Option<&Principal>) -> String {
    let mut body = String::from(
        r#"<h1>ログイン</h1>
<a href="/auth/github">GitHub でログイン</a>"#,
    );
    if let Some(p) = principal {
        let _ = write!(
            body,
            "\n<p>{} としてログインしています</p>",
            escape_html(&p.username)
        );
    }
    layout("ログイン", principal, &body)
}

pub fn index_page(principal: Option<&Principal>, schedules: &[Schedule]) -> String {
    let body = match principal {
        None => r#"<h1>予定調整</h1>
<p><a href="/auth/github">GitHub でログイン</a>して予定を作成できます。</p>"#
            .to_string(),
        Some(_) => {
            let mut body = String::from(
                r#"<h1>予定調整</h1>
<a href="/schedules/new">予定を作る</a>
<h2>あなたの作った予定</h2>
<ul>"#,
            );
            for schedule in schedules {
                let _ = write!(
                    body,
                    r#"
<li><a href="/schedules/{}">{}</a> <small>{}</small></li>"#,
                    schedule.schedule_id,
                    escape_html(&schedule.schedule_name),
                    schedule.created_at.format("%Y/%m/%d %H:%M"),
                );
            }
            body.push_str("\n</ul>");
            body
        }
    };
    layout("予定調整", principal, &body)
}

pub fn new_schedule_page(principal: &Principal) -> String {
    let body = r#"<h1>予定を作る</h1>
<form method="post" action="/schedules">
<label>予定名<input type="text" name="scheduleName"></label>
<label>メモ<textarea name="memo"></textarea></label>
<label>候補日程 (改行して複数入力)<textarea name="candidates"></textarea></label>
<button type="submit">予定を作る</button>
</form>"#;
    layout("予定を作る", Some(principal), body)
}

pub fn schedule_page(
    principal: Option<&Principal>,
    schedule: &Schedule,
    owner: Option<&User>,
    grid: &AvailabilityGrid,
) -> String {
    let mut body = String::new();
    let _ = write!(
        body,
        r#"<h1>{name}</h1>
<p class="memo" style="white-space: pre-wrap;">{memo}</p>
<p>作成者: {owner}</p>"#,
        name = escape_html(&schedule.schedule_name),
        memo = escape_html(&schedule.memo),
        owner = owner
            .map(|u| escape_html(&u.username))
            .unwrap_or_else(|| schedule.created_by.to_string()),
    );

    body.push_str("\n<h2>出欠表</h2>\n<table>\n<tr><th>予定</th>");
    for user in &grid.users {
        let _ = write!(body, "<th>{}</th>", escape_html(&user.username));
    }
    body.push_str("</tr>");

    for row in &grid.rows {
        let _ = write!(
            body,
            "\n<tr><th>{}</th>",
            escape_html(&row.candidate.candidate_name)
        );
        for (user, answer) in grid.users.iter().zip(&row.answers) {
            let _ = write!(
                body,
                r#"<td data-schedule-id="{}" data-user-id="{}" data-candidate-id="{}" data-availability="{}">{}</td>"#,
                schedule.schedule_id,
                user.user_id,
                row.candidate.candidate_id,
                answer.as_i32(),
                answer.label(),
            );
        }
        body.push_str("</tr>");
    }
    body.push_str("\n</table>");

    if principal.is_some_and(|p| p.id == schedule.created_by) {
        let _ = write!(
            body,
            r#"
<form method="post" action="/schedules/{}/delete"><button type="submit">この予定を削除する</button></form>"#,
            schedule.schedule_id
        );
    }

    layout(&schedule.schedule_name, principal, &body)
}

pub fn error_page(principal: Option<&Principal>, title: &str, message: &str) -> String {
    let body = format!(
        "<h1>{}</h1>\n<p>{}</p>",
        escape_html(title),
        escape_html(message)
    );
    layout(title, principal, &body)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use shared::models::{AvailabilityEntry, AvailabilityKind, Candidate};
    use uuid::Uuid;

    use super::*;

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html("テスト"), "テスト");
    }

    #[test]
    fn login_page_always_links_to_github() {
        let anonymous = login_page(None);
        assert!(anonymous.contains(r#"<a href="/auth/github""#));

        let principal = Principal {
            id: 1,
            username: "testuser".to_string(),
        };
        let signed_in = login_page(Some(&principal));
        assert!(signed_in.contains(r#"<a href="/auth/github""#));
        assert!(signed_in.contains("testuser"));
    }

    #[test]
    fn schedule_page_renders_memo_lines_and_grid() {
        let schedule_id = Uuid::new_v4();
        let schedule = Schedule {
            schedule_id,
            schedule_name: "<script>".to_string(),
            memo: "一行目\r\n二行目".to_string(),
            created_by: 1,
            created_at: Utc::now(),
        };
        let owner = User {
            user_id: 1,
            username: "owner".to_string(),
        };
        let candidates = vec![Candidate {
            candidate_id: 10,
            candidate_name: "5/1".to_string(),
            schedule_id,
        }];
        let entries = vec![AvailabilityEntry {
            candidate_id: 10,
            user: owner.clone(),
            availability: AvailabilityKind::Available,
        }];
        let grid = AvailabilityGrid::build(candidates, &entries, None);

        let html = schedule_page(None, &schedule, Some(&owner), &grid);

        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("一行目\r\n二行目"));
        assert!(html.contains("white-space: pre-wrap"));
        assert!(html.contains("<th>5/1</th>"));
        assert!(html.contains(r#"data-availability="2">出</td>"#));
        assert!(!html.contains("/delete"));
    }
}
