//! Text-box page object against the in-memory page

use probekit_common::{FormField, TextBoxInput};
use probekit_e2e::page::{selectors, TEXT_BOX_URL};
use probekit_e2e::{BrowserSession, E2eError, PageState, TextBoxDouble, TextBoxPage};

fn donald() -> TextBoxInput {
    TextBoxInput::new(
        "Donald Duck",
        "donald.duck@example.com",
        "56 Main St",
        "379 Apple Rd",
    )
}

#[tokio::test]
async fn text_box_form() {
    let mut session = TextBoxDouble::new();
    let mut page = TextBoxPage::new(&mut session);
    page.navigate().await.unwrap();

    page.enter_full_name("Donald Duck").await.unwrap();
    page.enter_email("donald.duck@example.com").await.unwrap();
    page.enter_current_address("56 Main St").await.unwrap();
    page.enter_permanent_address("379 Apple Rd").await.unwrap();

    page.click_submit().await.unwrap();

    let form_data = page.get_submitted_form_data().await.unwrap();
    assert!(form_data.name.contains("Name:Donald Duck"));
    assert!(form_data.email.contains("Email:donald.duck@example.com"));
    assert!(form_data.current_address.contains("Current Address :56 Main St"));
    assert!(form_data
        .permanent_address
        .contains("Permananet Address :379 Apple Rd"));

    session.close().await.unwrap();
    assert!(session.is_closed());
}

#[tokio::test]
async fn submit_round_trip_has_no_mismatches() {
    let mut session = TextBoxDouble::new();
    let submission = TextBoxPage::new(&mut session)
        .submit(&donald())
        .await
        .unwrap();
    assert!(submission.mismatches(&donald()).is_empty());
}

#[tokio::test]
async fn state_transitions() {
    let mut session = TextBoxDouble::new();
    let mut page = TextBoxPage::new(&mut session);
    assert_eq!(page.state(), PageState::Unloaded);

    page.navigate().await.unwrap();
    assert_eq!(page.state(), PageState::Loaded);

    page.fill_form(&donald()).await.unwrap();
    page.click_submit().await.unwrap();
    assert_eq!(page.state(), PageState::Submitted);

    page.navigate().await.unwrap();
    assert_eq!(page.state(), PageState::Loaded);
}

#[tokio::test]
async fn entry_before_navigate_is_rejected() {
    let mut session = TextBoxDouble::new();
    let mut page = TextBoxPage::new(&mut session);

    let err = page.enter_full_name("Donald Duck").await.unwrap_err();
    assert!(matches!(
        err,
        E2eError::InvalidPageState {
            state: PageState::Unloaded,
            ..
        }
    ));
    assert!(page.click_submit().await.is_err());
}

#[tokio::test]
async fn reading_before_submit_is_rejected() {
    let mut session = TextBoxDouble::new();
    let mut page = TextBoxPage::new(&mut session);
    page.navigate().await.unwrap();
    page.fill_form(&donald()).await.unwrap();

    let err = page.get_submitted_form_data().await.unwrap_err();
    assert!(matches!(
        err,
        E2eError::InvalidPageState {
            state: PageState::Loaded,
            ..
        }
    ));
}

#[tokio::test]
async fn renavigation_clears_previous_entries() {
    let mut session = TextBoxDouble::new();
    {
        let mut page = TextBoxPage::new(&mut session);
        page.navigate().await.unwrap();
        page.enter_full_name("Donald Duck").await.unwrap();
        page.navigate().await.unwrap();
        page.enter_email("daisy@example.com").await.unwrap();
    }
    assert_eq!(session.input_value(FormField::Name), None);
    assert_eq!(session.input_value(FormField::Email), Some("daisy@example.com"));
}

#[tokio::test]
async fn failed_navigation_leaves_page_unloaded() {
    let mut session = TextBoxDouble::serving("https://staging.example.com/text-box");
    let mut page = TextBoxPage::new(&mut session);

    let err = page.navigate().await.unwrap_err();
    assert!(matches!(err, E2eError::Navigation { .. }));
    assert_eq!(page.state(), PageState::Unloaded);
}

#[tokio::test]
async fn custom_url() {
    let url = "https://staging.example.com/text-box";
    let mut session = TextBoxDouble::serving(url);
    let mut page = TextBoxPage::with_url(&mut session, url);
    assert_eq!(page.url(), url);
    page.navigate().await.unwrap();
}

#[tokio::test]
async fn missing_element_is_not_interactable() {
    let mut session = TextBoxDouble::new();
    session.goto(TEXT_BOX_URL).await.unwrap();

    let err = session.fill("#middleName", "x").await.unwrap_err();
    assert!(matches!(err, E2eError::ElementNotInteractable { .. }));

    let err = session.fill(selectors::OUTPUT_NAME, "x").await.unwrap_err();
    assert!(matches!(err, E2eError::ElementNotInteractable { .. }));
}

#[tokio::test]
async fn works_through_boxed_session() {
    let mut session: Box<dyn BrowserSession> = Box::new(TextBoxDouble::new());
    let submission = TextBoxPage::new(&mut session).submit(&donald()).await.unwrap();
    assert_eq!(submission.name, "Name:Donald Duck");
}
