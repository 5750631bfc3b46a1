#![allow(dead_code)] // OpenAPI doc stubs are only referenced by utoipa macros.

use crate::{
    error::ErrorResponse,
    models::{
        class::{AssignSubject, Class, ClassSubject, CreateClass, UpdateClass},
        enrollment::{CreateEnrollment, Enrollment, EnrollmentQuery, UpdateEnrollment},
        student::{CreateStudentProfile, StudentProfile, UpdateStudentProfile},
        subject::{CreateSubject, Subject, UpdateSubject},
        teacher::{CreateTeacherProfile, TeacherProfile, UpdateTeacherProfile},
        user::{
            CreateUser, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
            RegisterRequest, UpdateProfile, UserEnvelope, UserResponse, UserRole,
        },
        MessageResponse,
    },
    types::{
        ClassId, ClassSubjectId, EnrollmentId, StudentProfileId, SubjectId, TeacherProfileId,
        UserId,
    },
};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        register_doc,
        login_doc,
        refresh_doc,
        logout_doc,
        get_profile_doc,
        update_profile_doc,
        list_users_doc,
        create_user_doc,
        delete_user_doc,
        list_students_doc,
        create_student_doc,
        get_student_doc,
        update_student_doc,
        delete_student_doc,
        list_teachers_doc,
        create_teacher_doc,
        get_teacher_doc,
        update_teacher_doc,
        delete_teacher_doc,
        list_classes_doc,
        create_class_doc,
        get_class_doc,
        update_class_doc,
        delete_class_doc,
        list_class_subjects_doc,
        assign_subject_doc,
        unassign_subject_doc,
        list_subjects_doc,
        create_subject_doc,
        get_subject_doc,
        update_subject_doc,
        delete_subject_doc,
        list_enrollments_doc,
        create_enrollment_doc,
        update_enrollment_doc,
        delete_enrollment_doc
    ),
    components(
        schemas(
            // auth
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            RefreshRequest,
            RefreshResponse,
            UpdateProfile,
            MessageResponse,
            ErrorResponse,
            // users
            CreateUser,
            UserResponse,
            UserEnvelope,
            UserRole,
            // reference data
            StudentProfile,
            CreateStudentProfile,
            UpdateStudentProfile,
            TeacherProfile,
            CreateTeacherProfile,
            UpdateTeacherProfile,
            Class,
            CreateClass,
            UpdateClass,
            ClassSubject,
            AssignSubject,
            Subject,
            CreateSubject,
            UpdateSubject,
            Enrollment,
            CreateEnrollment,
            UpdateEnrollment
        )
    ),
    modifiers(&SecuritySchemes),
    tags(
        (name = "Auth", description = "Registration, login, tokens and own profile"),
        (name = "Users", description = "Role-gated user management"),
        (name = "Students", description = "Student profiles"),
        (name = "Teachers", description = "Teacher profiles"),
        (name = "Classes", description = "Classes and their subjects"),
        (name = "Subjects", description = "Subject catalogue"),
        (name = "Enrollments", description = "Student enrollments in classes")
    ),
    security(("BearerAuth" = []))
)]
pub struct ApiDoc;

struct SecuritySchemes;

impl Modify for SecuritySchemes {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_default();

        let mut bearer = Http::new(HttpAuthScheme::Bearer);
        bearer.bearer_format = Some("JWT".to_string());

        components.add_security_scheme("BearerAuth", SecurityScheme::Http(bearer));
    }
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Student account created", body = UserEnvelope),
        (status = 400, description = "Missing fields, invalid format or duplicate", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn register_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 400, description = "Missing credentials", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 403, description = "Another session is already active", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn login_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/token/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshResponse),
        (status = 401, description = "Invalid refresh token or inactive session", body = ErrorResponse)
    ),
    tag = "Auth",
    security(())
)]
fn refresh_doc() {}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session ended", body = MessageResponse),
        (status = 404, description = "No active session", body = ErrorResponse)
    ),
    tag = "Auth"
)]
fn logout_doc() {}

#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses((status = 200, description = "Current user", body = UserResponse)),
    tag = "Auth"
)]
fn get_profile_doc() {}

#[utoipa::path(
    put,
    path = "/api/auth/profile",
    request_body = UpdateProfile,
    responses(
        (status = 200, description = "Profile updated", body = UserEnvelope),
        (status = 400, description = "Invalid field or email in use", body = ErrorResponse)
    ),
    tag = "Auth"
)]
fn update_profile_doc() {}

#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All users (admin) or students (teacher)", body = [UserResponse]),
        (status = 403, description = "Students may not list users", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn list_users_doc() {}

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserEnvelope),
        (status = 403, description = "Admin only", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn create_user_doc() {}

#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = UserId, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 400, description = "Admins cannot delete themselves", body = ErrorResponse),
        (status = 403, description = "Not allowed to delete this user", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    ),
    tag = "Users"
)]
fn delete_user_doc() {}

#[utoipa::path(
    get,
    path = "/api/students",
    responses((status = 200, description = "Student profiles", body = [StudentProfile])),
    tag = "Students"
)]
fn list_students_doc() {}

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentProfile,
    responses(
        (status = 201, description = "Profile created", body = StudentProfile),
        (status = 409, description = "Profile or roll number already exists", body = ErrorResponse)
    ),
    tag = "Students"
)]
fn create_student_doc() {}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = StudentProfileId, Path, description = "Student profile ID")),
    responses((status = 200, description = "Student profile", body = StudentProfile)),
    tag = "Students"
)]
fn get_student_doc() {}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = StudentProfileId, Path, description = "Student profile ID")),
    request_body = UpdateStudentProfile,
    responses((status = 200, description = "Profile updated", body = StudentProfile)),
    tag = "Students"
)]
fn update_student_doc() {}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = StudentProfileId, Path, description = "Student profile ID")),
    responses((status = 200, description = "Profile deleted", body = MessageResponse)),
    tag = "Students"
)]
fn delete_student_doc() {}

#[utoipa::path(
    get,
    path = "/api/teachers",
    responses((status = 200, description = "Teacher profiles", body = [TeacherProfile])),
    tag = "Teachers"
)]
fn list_teachers_doc() {}

#[utoipa::path(
    post,
    path = "/api/teachers",
    request_body = CreateTeacherProfile,
    responses((status = 201, description = "Profile created", body = TeacherProfile)),
    tag = "Teachers"
)]
fn create_teacher_doc() {}

#[utoipa::path(
    get,
    path = "/api/teachers/{id}",
    params(("id" = TeacherProfileId, Path, description = "Teacher profile ID")),
    responses((status = 200, description = "Teacher profile", body = TeacherProfile)),
    tag = "Teachers"
)]
fn get_teacher_doc() {}

#[utoipa::path(
    put,
    path = "/api/teachers/{id}",
    params(("id" = TeacherProfileId, Path, description = "Teacher profile ID")),
    request_body = UpdateTeacherProfile,
    responses((status = 200, description = "Profile updated", body = TeacherProfile)),
    tag = "Teachers"
)]
fn update_teacher_doc() {}

#[utoipa::path(
    delete,
    path = "/api/teachers/{id}",
    params(("id" = TeacherProfileId, Path, description = "Teacher profile ID")),
    responses((status = 200, description = "Profile deleted", body = MessageResponse)),
    tag = "Teachers"
)]
fn delete_teacher_doc() {}

#[utoipa::path(
    get,
    path = "/api/classes",
    responses((status = 200, description = "Classes", body = [Class])),
    tag = "Classes"
)]
fn list_classes_doc() {}

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClass,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 409, description = "Name and section already taken", body = ErrorResponse)
    ),
    tag = "Classes"
)]
fn create_class_doc() {}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses((status = 200, description = "Class", body = Class)),
    tag = "Classes"
)]
fn get_class_doc() {}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    request_body = UpdateClass,
    responses((status = 200, description = "Class updated", body = Class)),
    tag = "Classes"
)]
fn update_class_doc() {}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses((status = 200, description = "Class deleted", body = MessageResponse)),
    tag = "Classes"
)]
fn delete_class_doc() {}

#[utoipa::path(
    get,
    path = "/api/classes/{id}/subjects",
    params(("id" = ClassId, Path, description = "Class ID")),
    responses((status = 200, description = "Subjects taught in the class", body = [ClassSubject])),
    tag = "Classes"
)]
fn list_class_subjects_doc() {}

#[utoipa::path(
    post,
    path = "/api/classes/{id}/subjects",
    params(("id" = ClassId, Path, description = "Class ID")),
    request_body = AssignSubject,
    responses(
        (status = 201, description = "Subject linked", body = ClassSubject),
        (status = 409, description = "Subject already linked", body = ErrorResponse)
    ),
    tag = "Classes"
)]
fn assign_subject_doc() {}

#[utoipa::path(
    delete,
    path = "/api/class-subjects/{id}",
    params(("id" = ClassSubjectId, Path, description = "Class-subject link ID")),
    responses((status = 200, description = "Link removed", body = MessageResponse)),
    tag = "Classes"
)]
fn unassign_subject_doc() {}

#[utoipa::path(
    get,
    path = "/api/subjects",
    responses((status = 200, description = "Subjects", body = [Subject])),
    tag = "Subjects"
)]
fn list_subjects_doc() {}

#[utoipa::path(
    post,
    path = "/api/subjects",
    request_body = CreateSubject,
    responses(
        (status = 201, description = "Subject created", body = Subject),
        (status = 409, description = "Code already taken", body = ErrorResponse)
    ),
    tag = "Subjects"
)]
fn create_subject_doc() {}

#[utoipa::path(
    get,
    path = "/api/subjects/{id}",
    params(("id" = SubjectId, Path, description = "Subject ID")),
    responses((status = 200, description = "Subject", body = Subject)),
    tag = "Subjects"
)]
fn get_subject_doc() {}

#[utoipa::path(
    put,
    path = "/api/subjects/{id}",
    params(("id" = SubjectId, Path, description = "Subject ID")),
    request_body = UpdateSubject,
    responses((status = 200, description = "Subject updated", body = Subject)),
    tag = "Subjects"
)]
fn update_subject_doc() {}

#[utoipa::path(
    delete,
    path = "/api/subjects/{id}",
    params(("id" = SubjectId, Path, description = "Subject ID")),
    responses((status = 200, description = "Subject deleted", body = MessageResponse)),
    tag = "Subjects"
)]
fn delete_subject_doc() {}

#[utoipa::path(
    get,
    path = "/api/enrollments",
    params(EnrollmentQuery),
    responses((status = 200, description = "Enrollments", body = [Enrollment])),
    tag = "Enrollments"
)]
fn list_enrollments_doc() {}

#[utoipa::path(
    post,
    path = "/api/enrollments",
    request_body = CreateEnrollment,
    responses(
        (status = 201, description = "Student enrolled", body = Enrollment),
        (status = 409, description = "Already enrolled", body = ErrorResponse)
    ),
    tag = "Enrollments"
)]
fn create_enrollment_doc() {}

#[utoipa::path(
    put,
    path = "/api/enrollments/{id}",
    params(("id" = EnrollmentId, Path, description = "Enrollment ID")),
    request_body = UpdateEnrollment,
    responses((status = 200, description = "Enrollment updated", body = Enrollment)),
    tag = "Enrollments"
)]
fn update_enrollment_doc() {}

#[utoipa::path(
    delete,
    path = "/api/enrollments/{id}",
    params(("id" = EnrollmentId, Path, description = "Enrollment ID")),
    responses((status = 200, description = "Enrollment deleted", body = MessageResponse)),
    tag = "Enrollments"
)]
fn delete_enrollment_doc() {}
