use sp_core::{
    Caption, Command, CommandCatalog, ControlTemplate, CoreResult, FieldDefaults, SectionTemplate,
    SettingValue, ToggleGroup,
};

/// Field names of the built-in catalog.
pub mod fields {
    pub const USERNAME: &str = "username";
    pub const BIO: &str = "bio";
    pub const EMAIL: &str = "email";
    pub const PHONE: &str = "phone";
    pub const LIKES: &str = "likes";
    pub const COMMENTS: &str = "comments";
    pub const LIVE_VIDEOS: &str = "live_videos";
    pub const NEW_FOLLOWERS: &str = "new_followers";
    pub const DIRECT_MESSAGES: &str = "direct_messages";
    pub const AUTO_LOGIN: &str = "auto_login";
    pub const CONTACT_SYNCING: &str = "contact_syncing";
    pub const PRIVATE_ACCOUNT: &str = "private_account";
    pub const ALLOW_COMMENTS: &str = "allow_comments";
    pub const ALLOW_MENTIONS: &str = "allow_mentions";
    pub const ALLOW_MESSAGES: &str = "allow_messages";
}

/// Audiences offered by the interaction privacy pickers, widest first.
pub const PRIVACY_OPTIONS: [&str; 5] = [
    "Everyone",
    "People I Follow and My Followers",
    "People I Follow Only",
    "My Followers Only",
    "No One",
];

const EVERYONE: &str = PRIVACY_OPTIONS[0];
const FOLLOWING_ONLY: &str = PRIVACY_OPTIONS[2];

/// Search terms shared by most screens that change something.
const EDIT_WORDS: [&str; 4] = ["Set", "Edit", "Modify", "Change"];

use fields::*;

fn off() -> SettingValue {
    SettingValue::Bool(false)
}

fn on() -> SettingValue {
    SettingValue::Bool(true)
}

fn text(value: &str) -> SettingValue {
    SettingValue::Text(value.to_string())
}

/// Who a notification type is delivered for.
fn audiences() -> SettingValue {
    SettingValue::Toggles(
        ToggleGroup::new()
            .with("following", true)
            .with("followers", true)
            .with("others", true),
    )
}

fn synonyms(extra: &[&'static str]) -> Vec<&'static str> {
    EDIT_WORDS.iter().chain(extra).copied().collect()
}

fn privacy_picker(field: &str, header: &str, footer: &str) -> SectionTemplate {
    SectionTemplate::new()
        .header(header)
        .footer(footer)
        .control(ControlTemplate::picker("Audience", field, PRIVACY_OPTIONS))
}

fn comments_section() -> SectionTemplate {
    privacy_picker(
        ALLOW_COMMENTS,
        "Allow Comments From",
        "Choose who can comment under your posts.",
    )
}

fn mentions_section() -> SectionTemplate {
    privacy_picker(
        ALLOW_MENTIONS,
        "Allow Mentions From",
        "Choose who can @mention you under their posts.",
    )
}

fn messages_section() -> SectionTemplate {
    privacy_picker(
        ALLOW_MESSAGES,
        "Allow Direct Messages From",
        "Choose who can send you direct messages.",
    )
}

fn toggle_section(label: &str, field: &str, footer: &str) -> SectionTemplate {
    SectionTemplate::new()
        .footer(footer)
        .control(ControlTemplate::toggle(label, field))
}

/// The settings screens shipped with the app, in home-grid order.
pub fn builtin_catalog() -> CoreResult<CommandCatalog> {
    CommandCatalog::new(vec![
        Command::builder("Edit Username")
            .path(["Profile"])
            .synonyms(["Change", "Modify"])
            .suggested(false)
            .behavior(
                FieldDefaults::new()
                    .saved_field(USERNAME, text("john_appleseed"))
                    .section(
                        SectionTemplate::new()
                            .control(ControlTemplate::text_field("Username", USERNAME))
                            .footer(Caption::when_edited(
                                USERNAME,
                                "You can only edit your username once every 14 days.",
                                "You will need to use your new username \"{value}\" next time you log in.",
                            )),
                    ),
            )
            .build()?,
        Command::builder("Edit Bio")
            .path(["Profile"])
            .synonyms(["Change", "Modify", "Biography"])
            .behavior(
                FieldDefaults::new().saved_field(BIO, text("")).section(
                    SectionTemplate::new()
                        .control(ControlTemplate::text_field("Bio", BIO))
                        .footer("Your bio is visible to everyone."),
                ),
            )
            .build()?,
        Command::builder("Notifications")
            .path(["Settings"])
            .synonyms(synonyms(&[
                "Alerts", "Likes", "Comments", "Messages", "Direct", "Live", "Videos", "New",
                "Followers",
            ]))
            .behavior(
                FieldDefaults::new()
                    .field(LIKES, audiences())
                    .field(COMMENTS, audiences())
                    .field(LIVE_VIDEOS, on())
                    .field(NEW_FOLLOWERS, on())
                    .field(DIRECT_MESSAGES, on())
                    .section(
                        SectionTemplate::new()
                            .header("Likes")
                            .footer("Choose when to notify you when someone liked your post.")
                            .control(ControlTemplate::toggle_group("Likes From", LIKES)),
                    )
                    .section(
                        SectionTemplate::new()
                            .header("Comments")
                            .footer("Choose when to notify you when someone commented under your post.")
                            .control(ControlTemplate::toggle_group("Comments From", COMMENTS)),
                    )
                    .section(toggle_section(
                        "Live Videos",
                        LIVE_VIDEOS,
                        "Choose when to notify you when someone you follow started a live video.",
                    ))
                    .section(toggle_section(
                        "New Followers",
                        NEW_FOLLOWERS,
                        "Choose whether to notify you when someone started following you.",
                    ))
                    .section(toggle_section(
                        "Direct Messages",
                        DIRECT_MESSAGES,
                        "Choose whether to notify you when someone sent you a direct message.",
                    )),
            )
            .build()?,
        Command::builder("Auto Login")
            .path(["Settings", "Security"])
            .synonyms(synonyms(&["Automatically", "Username", "Password", "Devices"]))
            .behavior(
                FieldDefaults::new().field(AUTO_LOGIN, off()).section(toggle_section(
                    "Log in Automatically",
                    AUTO_LOGIN,
                    "Choose whether to save your username and password and log in automatically on all your devices.",
                )),
            )
            .build()?,
        Command::builder("Contacts Syncing")
            .path(["Settings", "Account"])
            .synonyms(synonyms(&["Automatically", "Friends"]))
            .behavior(
                FieldDefaults::new()
                    .field(CONTACT_SYNCING, off())
                    .section(toggle_section(
                        "Sync Contacts",
                        CONTACT_SYNCING,
                        "Choose whether to automatically find your friends in your contacts.",
                    )),
            )
            .build()?,
        Command::builder("Change Email")
            .path(["Settings", "Account", "Personal Info"])
            .synonyms(["Edit", "Modify", "Address"])
            .suggested(false)
            .behavior(
                FieldDefaults::new()
                    .saved_field(EMAIL, text("john.appleseed@example.com"))
                    .section(
                        SectionTemplate::new()
                            .control(ControlTemplate::text_field("Email", EMAIL))
                            .footer("Your email address is only visible to yourself."),
                    ),
            )
            .build()?,
        Command::builder("Change Number")
            .path(["Settings", "Account", "Personal Info"])
            .synonyms(["Edit", "Modify", "Telephone"])
            .behavior(
                FieldDefaults::new()
                    .saved_field(PHONE, text("2125550123"))
                    .section(
                        SectionTemplate::new()
                            .control(ControlTemplate::text_field("Phone", PHONE))
                            .footer("Your phone number is only visible to yourself."),
                    ),
            )
            .build()?,
        Command::builder("Account Privacy")
            .path(["Settings", "Privacy"])
            .synonyms(synonyms(&["Private", "Allowed", "Visible", "Visibility"]))
            .suggested(false)
            .behavior(
                FieldDefaults::new()
                    .field(PRIVATE_ACCOUNT, off())
                    .section(toggle_section(
                        "Private Account",
                        PRIVATE_ACCOUNT,
                        "Set your account to private to make it visible to your followers only.",
                    )),
            )
            .build()?,
        Command::builder("Interaction Privacy")
            .path(["Settings", "Privacy"])
            .synonyms(synonyms(&[
                "Private", "Allowed", "Comments", "Posts", "Mentions", "Messages",
            ]))
            .suggested(false)
            .behavior(
                FieldDefaults::new()
                    .field(ALLOW_COMMENTS, text(EVERYONE))
                    .field(ALLOW_MENTIONS, text(EVERYONE))
                    .field(ALLOW_MESSAGES, text(FOLLOWING_ONLY))
                    .section(comments_section())
                    .section(mentions_section())
                    .section(messages_section()),
            )
            .build()?,
        Command::builder("Comment Privacy")
            .path(["Settings", "Privacy", "Interactions"])
            .synonyms(synonyms(&["Private", "Allowed", "Comments", "Posts"]))
            .behavior(
                FieldDefaults::new()
                    .field(ALLOW_COMMENTS, text(EVERYONE))
                    .section(comments_section()),
            )
            .build()?,
        Command::builder("Mentions Privacy")
            .path(["Settings", "Privacy", "Interactions"])
            .synonyms(synonyms(&["Private", "Allowed", "Posts"]))
            .suggested(false)
            .behavior(
                FieldDefaults::new()
                    .field(ALLOW_MENTIONS, text(EVERYONE))
                    .section(mentions_section()),
            )
            .build()?,
        Command::builder("Message Privacy")
            .path(["Settings", "Privacy", "Interactions"])
            .synonyms(synonyms(&["Private", "Allowed", "Messages", "Direct"]))
            .suggested(false)
            .behavior(
                FieldDefaults::new()
                    .field(ALLOW_MESSAGES, text(FOLLOWING_ONLY))
                    .section(messages_section()),
            )
            .build()?,
    ])
}
