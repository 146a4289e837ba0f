use crate::helpers::test_app::{error_type, RoomSnapshot, TestApp};
use serde_json::Value;

#[tokio::test]
async fn created_room_is_waiting_with_the_creator_as_host() {
    let app = TestApp::spawn_app().await;

    let created = app.create_room("alice").await;
    let response = app.get_room(&created.room_code).await;

    assert!(response.status().is_success());
    let room: RoomSnapshot = response.json().await.unwrap();
    assert_eq!(room.room_code, created.room_code);
    assert_eq!(room.status, "WAITING");
    assert_eq!(room.host_player_id, Some(created.player_id));
    assert_eq!(room.players.len(), 1);
    assert_eq!(room.players[0].nickname, "alice");
    assert!(room.players[0].is_host);
    assert_eq!(room.players[0].score, 0);
    assert_eq!(created.nickname, "alice");
}

#[tokio::test]
async fn unknown_room_is_not_found() {
    let app = TestApp::spawn_app().await;

    let response = app.get_room("NOPE00").await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_type(response).await, "ROOM_NOT_FOUND");
}

#[tokio::test]
async fn players_join_in_order() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("alice").await;

    let bob = app.join_room_ok(&created.room_code, "bob").await;
    let carol = app.join_room_ok(&created.room_code, "carol").await;

    assert_eq!(bob.nickname, "bob");
    let players: Vec<u64> = carol
        .room
        .players
        .iter()
        .map(|player| player.player_id)
        .collect();
    assert_eq!(players, vec![created.player_id, bob.player_id, carol.player_id]);
    assert!(!carol.room.players[2].is_host);
    assert_eq!(carol.room.total_rounds, 0);
    assert_eq!(carol.room.current_round, 0);
}

#[tokio::test]
async fn joining_without_nickname_generates_one() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("alice").await;

    let response = reqwest::Client::new()
        .post(format!(
            "http://{}/api/rooms/{}/players",
            app.base_address, created.room_code
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 201);
    let joined: Value = response.json().await.unwrap();
    assert!(joined["nickname"].as_str().unwrap().starts_with("Player"));
}

#[tokio::test]
async fn host_leaving_promotes_the_next_player() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("alice").await;
    let bob = app.join_room_ok(&created.room_code, "bob").await;

    let response = app.leave_room(&created.room_code, created.player_id).await;

    assert!(response.status().is_success());
    let left: Value = response.json().await.unwrap();
    assert_eq!(left["roomDeleted"], false);
    assert_eq!(left["newHostPlayerId"], bob.player_id);
    assert_eq!(left["remainingPlayers"], 1);

    let room: RoomSnapshot = app.get_room(&created.room_code).await.json().await.unwrap();
    assert_eq!(room.host_player_id, Some(bob.player_id));
    assert!(room.players[0].is_host);
}

#[tokio::test]
async fn last_player_leaving_deletes_the_room() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("alice").await;

    let response = app.leave_room(&created.room_code, created.player_id).await;

    let left: Value = response.json().await.unwrap();
    assert_eq!(left["roomDeleted"], true);
    assert_eq!(app.get_room(&created.room_code).await.status().as_u16(), 404);
}

#[tokio::test]
async fn leaving_with_an_unknown_player_is_not_found() {
    let app = TestApp::spawn_app().await;
    let created = app.create_room("alice").await;

    let response = app.leave_room(&created.room_code, 9999).await;

    assert_eq!(response.status().as_u16(), 404);
    assert_eq!(error_type(response).await, "PLAYER_NOT_FOUND");
}
