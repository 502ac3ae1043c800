use super::*;

/// Tests retrieving the logged in user's member object.
///
/// Expected: Ok with the guild nickname, requested for the given guild ID
#[tokio::test]
async fn returns_member_details() {
    let test = TestBuilder::new()
        .with_member(factory::guild_member("42", Some("Captain")))
        .build()
        .await
        .unwrap();
    let fetcher = fetcher();

    let member = GuildMemberService::new(&fetcher, &test.discord.url)
        .get_current_member(USER_TOKEN, 123456789)
        .await
        .unwrap();

    assert_eq!(member.nick.as_deref(), Some("Captain"));
    assert_eq!(member.user.map(|u| u.id), Some("42".to_string()));
    assert_eq!(test.discord.member_guild_ids(), vec!["123456789"]);
}

/// Tests that member lookups are not retried.
///
/// Expected: Err(UpstreamError) for the member lookup after a single request
#[tokio::test]
async fn does_not_retry_member_lookup() {
    let test = TestBuilder::new()
        .failing_member_requests(1)
        .build()
        .await
        .unwrap();
    let fetcher = fetcher();

    let result = GuildMemberService::new(&fetcher, &test.discord.url)
        .get_current_member(USER_TOKEN, 1)
        .await;

    assert!(matches!(
        result,
        Err(AppError::UpstreamErr(ref e)) if e.upstream() == UpstreamSource::GuildMember
    ));
    assert_eq!(test.discord.member_hits(), 1);
}
