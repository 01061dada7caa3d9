//! Test helpers.

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{affix_state::inject, prelude::*};
use uuid::Uuid;

use mailroom::{
    actor::{Actor, Role},
    aliases::{AliasSuggestionStatus, AliasType},
    mail_items::{MailItemStatus, PackageType},
    requests::{RequestStatus, RequestType},
    uuids::{
        ActorUuid, AliasSuggestionUuid, CompanyAliasUuid, CompanyUuid, LocationUuid,
        MailItemUuid, MailRequestUuid, MailboxUuid, TenantUuid,
    },
};
use mailroom_app::{
    context::AppContext,
    domain::{
        aliases::{
            MockAliasesService,
            records::{AliasSuggestionRecord, CompanyAliasRecord},
        },
        audit::MockAuditService,
        health::MockHealthService,
        mail_items::{MockMailItemsService, records::MailItemRecord},
        requests::{MockRequestsService, records::MailRequestRecord},
    },
};

use crate::{errors::malformed_input, state::State};

pub(crate) const TEST_TENANT_UUID: TenantUuid = TenantUuid::from_uuid(Uuid::from_u128(1));
pub(crate) const TEST_LOCATION_UUID: LocationUuid = LocationUuid::from_uuid(Uuid::from_u128(2));
pub(crate) const TEST_MAILBOX_UUID: MailboxUuid = MailboxUuid::from_uuid(Uuid::from_u128(3));
pub(crate) const TEST_ACTOR_UUID: ActorUuid = ActorUuid::from_uuid(Uuid::from_u128(4));
pub(crate) const TEST_COMPANY_UUID: CompanyUuid = CompanyUuid::from_uuid(Uuid::from_u128(5));

/// Location staff at [`TEST_LOCATION_UUID`].
pub(crate) fn test_staff() -> Actor {
    Actor::new(TEST_ACTOR_UUID, TEST_TENANT_UUID)
        .with_role(Role::LocationStaff)
        .with_location(TEST_LOCATION_UUID)
}

/// Service mocks backing one test router. Unset mocks reject every call.
#[derive(Default)]
pub(crate) struct MockApp {
    pub(crate) mail_items: MockMailItemsService,
    pub(crate) requests: MockRequestsService,
    pub(crate) aliases: MockAliasesService,
    pub(crate) audit: MockAuditService,
    pub(crate) health: MockHealthService,
}

impl MockApp {
    /// Serve `route` as [`test_staff`].
    pub(crate) fn service(self, route: Router) -> Service {
        self.service_as(test_staff(), route)
    }

    /// Serve `route` as `actor`, bypassing header claims.
    pub(crate) fn service_as(self, actor: Actor, route: Router) -> Service {
        let app = AppContext {
            mail_items: Arc::new(self.mail_items),
            requests: Arc::new(self.requests),
            aliases: Arc::new(self.aliases),
            audit: Arc::new(self.audit),
            health: Arc::new(self.health),
        };

        Service::new(
            Router::new()
                .hoop(inject(State::from_app_context(app)))
                .hoop(inject(actor))
                .hoop(malformed_input)
                .push(route),
        )
    }
}

pub(crate) fn make_mail_item(uuid: Uuid) -> MailItemRecord {
    MailItemRecord {
        uuid: MailItemUuid::from_uuid(uuid),
        tenant_uuid: TEST_TENANT_UUID,
        location_uuid: TEST_LOCATION_UUID,
        mailbox_uuid: TEST_MAILBOX_UUID,
        package_type: PackageType::Package,
        status: MailItemStatus::Uploaded,
        carrier: Some("UPS".to_string()),
        tracking_number: None,
        is_active: true,
        received_at: Timestamp::UNIX_EPOCH,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_request(uuid: Uuid, mail_item: Uuid) -> MailRequestRecord {
    MailRequestRecord {
        uuid: MailRequestUuid::from_uuid(uuid),
        tenant_uuid: TEST_TENANT_UUID,
        mail_item_uuid: MailItemUuid::from_uuid(mail_item),
        location_uuid: TEST_LOCATION_UUID,
        mailbox_uuid: TEST_MAILBOX_UUID,
        request_type: RequestType::Forward,
        status: RequestStatus::Pending,
        requested_by: TEST_ACTOR_UUID,
        requested_at: Timestamp::UNIX_EPOCH,
        completed_at: None,
        completion_metadata: None,
        note_internal: None,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_suggestion(uuid: Uuid) -> AliasSuggestionRecord {
    AliasSuggestionRecord {
        uuid: AliasSuggestionUuid::from_uuid(uuid),
        tenant_uuid: TEST_TENANT_UUID,
        location_uuid: TEST_LOCATION_UUID,
        suggested_alias: "ACME Widgets".to_string(),
        normalized_alias: None,
        company_uuid: Some(TEST_COMPANY_UUID),
        status: AliasSuggestionStatus::Pending,
        submitted_by: TEST_ACTOR_UUID,
        decided_by: None,
        decided_at: None,
        notes: None,
        company_alias_uuid: None,
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn make_company_alias(uuid: Uuid) -> CompanyAliasRecord {
    CompanyAliasRecord {
        uuid: CompanyAliasUuid::from_uuid(uuid),
        tenant_uuid: TEST_TENANT_UUID,
        company_uuid: TEST_COMPANY_UUID,
        mailbox_uuid: Some(TEST_MAILBOX_UUID),
        alias_suggestion_uuid: None,
        alias_name: "ACME Widgets".to_string(),
        normalized_alias: "acme widgets".to_string(),
        alias_type: AliasType::OcrVariant,
        is_active: true,
        activated_at: Timestamp::UNIX_EPOCH,
        created_by: TEST_ACTOR_UUID,
        created_at: Timestamp::UNIX_EPOCH,
    }
}
